//! 坐标文本表示法
//!
//! 列用字母 A-H（0 → A），行用数字 1-8（0 → 1），如 `D3` 表示第 3 行第 4 列。
//! 只用于说明和日志中的可读标签，内部一律使用 [`Position`] 索引。

use std::str::FromStr;

use crate::constants::{BOARD_SIZE, COLUMN_LETTERS};
use crate::disc::Position;
use crate::error::ReversiError;
use crate::moves::Move;

/// 坐标表示法
pub struct Notation;

impl Notation {
    /// 位置转换为文本
    pub fn to_text(pos: Position) -> String {
        let col = COLUMN_LETTERS
            .get(pos.col as usize)
            .copied()
            .unwrap_or('?');
        format!("{}{}", col, pos.row + 1)
    }

    /// 走法转换为文本
    pub fn move_to_text(mv: &Move) -> String {
        Self::to_text(mv.pos)
    }

    /// 走法序列转换为文本列表（用于主要变例）
    pub fn line_to_text(line: &[Move]) -> Vec<String> {
        line.iter().map(Self::move_to_text).collect()
    }

    /// 解析文本（大小写不敏感，允许首尾空白）
    pub fn parse(text: &str) -> Result<Position, ReversiError> {
        let invalid = || ReversiError::InvalidCoordinate {
            text: text.to_string(),
        };

        let trimmed = text.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        let digits = chars.as_str();

        let col = COLUMN_LETTERS
            .iter()
            .position(|&c| c == letter)
            .ok_or_else(invalid)?;
        let row: usize = digits.parse().map_err(|_| invalid())?;

        if row == 0 || row > BOARD_SIZE {
            return Err(invalid());
        }

        Position::new((row - 1) as u8, col as u8).ok_or_else(invalid)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&Notation::to_text(*self))
    }
}

impl FromStr for Position {
    type Err = ReversiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Notation::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        assert_eq!(Notation::to_text(Position::new_unchecked(0, 0)), "A1");
        assert_eq!(Notation::to_text(Position::new_unchecked(2, 3)), "D3");
        assert_eq!(Notation::to_text(Position::new_unchecked(7, 7)), "H8");
    }

    #[test]
    fn test_roundtrip_all_cells() {
        for pos in Position::all() {
            let text = Notation::to_text(pos);
            assert_eq!(Notation::parse(&text).unwrap(), pos, "{}", text);
        }
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(
            Notation::parse(" d3 ").unwrap(),
            Position::new_unchecked(2, 3)
        );
        assert_eq!("h8".parse::<Position>().unwrap(), Position::new_unchecked(7, 7));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Notation::parse("").is_err());
        assert!(Notation::parse("I1").is_err());
        assert!(Notation::parse("A0").is_err());
        assert!(Notation::parse("A9").is_err());
        assert!(Notation::parse("AA").is_err());
        assert!(Notation::parse("3D").is_err());
    }

    #[test]
    fn test_line_to_text() {
        let line = vec![
            Move::new(Position::new_unchecked(2, 3), vec![Position::new_unchecked(3, 3)]),
            Move::new(Position::new_unchecked(2, 2), vec![Position::new_unchecked(3, 3)]),
        ];
        assert_eq!(Notation::line_to_text(&line), vec!["D3", "C3"]);
    }
}
