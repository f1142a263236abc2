//! 棋子阵营与棋盘坐标

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, CORNERS, X_SQUARES};

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// 黑方（默认先手）
    Black,
    /// 白方
    White,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// 获取棋盘文本字符
    pub fn to_char(&self) -> char {
        match self {
            Side::Black => 'B',
            Side::White => 'W',
        }
    }

    /// 从棋盘文本字符解析
    pub fn from_char(c: char) -> Option<Side> {
        match c {
            'B' | 'b' | 'X' | 'x' => Some(Side::Black),
            'W' | 'w' | 'O' | 'o' => Some(Side::White),
            _ => None,
        }
    }

    /// 日志中使用的名称
    pub fn name(&self) -> &'static str {
        match self {
            Side::Black => "BLACK",
            Side::White => "WHITE",
        }
    }

    /// 中文显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Side::Black => "黑方",
            Side::White => "白方",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// 行 (0-7)，文本中为 1-8
    pub row: u8,
    /// 列 (0-7)，文本中为 A-H
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// 获取偏移后的位置
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row >= 0 && (row as usize) < BOARD_SIZE && col >= 0 && (col as usize) < BOARD_SIZE {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引（行优先）
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Position {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }

    /// 按行优先顺序遍历全部 64 个位置
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE * BOARD_SIZE).map(|i| Position {
            row: (i / BOARD_SIZE) as u8,
            col: (i % BOARD_SIZE) as u8,
        })
    }

    /// 是否为角
    pub fn is_corner(&self) -> bool {
        CORNERS.contains(&(self.row, self.col))
    }

    /// 是否为 X 格（角的斜向邻格）
    pub fn is_x_square(&self) -> bool {
        self.x_square_corner().is_some()
    }

    /// 是否为角的横竖邻格（C 格）
    pub fn is_corner_adjacent(&self) -> bool {
        let (r, c) = (self.row, self.col);
        (r == 0 && (c == 1 || c == 6))
            || (r == 7 && (c == 1 || c == 6))
            || (c == 0 && (r == 1 || r == 6))
            || (c == 7 && (r == 1 || r == 6))
    }

    /// X 格所对应的角；非 X 格返回 None
    pub fn x_square_corner(&self) -> Option<Position> {
        X_SQUARES
            .iter()
            .find(|(x, _)| *x == (self.row, self.col))
            .map(|(_, (r, c))| Position::new_unchecked(*r, *c))
    }

    /// 四个角
    pub fn corners() -> [Position; 4] {
        CORNERS.map(|(r, c)| Position::new_unchecked(r, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Black.opponent(), Side::White);
        assert_eq!(Side::White.opponent(), Side::Black);
    }

    #[test]
    fn test_side_char() {
        assert_eq!(Side::from_char('B'), Some(Side::Black));
        assert_eq!(Side::from_char('o'), Some(Side::White));
        assert_eq!(Side::from_char('.'), None);
        assert_eq!(Side::White.to_char(), 'W');
    }

    #[test]
    fn test_position_valid() {
        assert!(Position::new(0, 0).is_some());
        assert!(Position::new(7, 7).is_some());
        assert!(Position::new(8, 0).is_none());
        assert!(Position::new(0, 8).is_none());
    }

    #[test]
    fn test_index_roundtrip() {
        for (i, pos) in Position::all().enumerate() {
            assert_eq!(pos.to_index(), i);
            assert_eq!(Position::from_index(i), Some(pos));
        }
        assert_eq!(Position::from_index(64), None);
    }

    #[test]
    fn test_corners_exact() {
        let corners: Vec<_> = Position::all().filter(|p| p.is_corner()).collect();
        assert_eq!(
            corners,
            vec![
                Position::new_unchecked(0, 0),
                Position::new_unchecked(0, 7),
                Position::new_unchecked(7, 0),
                Position::new_unchecked(7, 7),
            ]
        );
    }

    #[test]
    fn test_x_squares() {
        let xs: Vec<_> = Position::all().filter(|p| p.is_x_square()).collect();
        assert_eq!(xs.len(), 4);
        assert_eq!(
            Position::new_unchecked(1, 1).x_square_corner(),
            Some(Position::new_unchecked(0, 0))
        );
        assert_eq!(
            Position::new_unchecked(1, 6).x_square_corner(),
            Some(Position::new_unchecked(0, 7))
        );
        assert_eq!(
            Position::new_unchecked(6, 1).x_square_corner(),
            Some(Position::new_unchecked(7, 0))
        );
        assert_eq!(
            Position::new_unchecked(6, 6).x_square_corner(),
            Some(Position::new_unchecked(7, 7))
        );
        assert_eq!(Position::new_unchecked(0, 1).x_square_corner(), None);
    }

    #[test]
    fn test_corner_adjacent() {
        let adj: Vec<_> = Position::all().filter(|p| p.is_corner_adjacent()).collect();
        assert_eq!(adj.len(), 8);
        assert!(Position::new_unchecked(0, 1).is_corner_adjacent());
        assert!(Position::new_unchecked(6, 7).is_corner_adjacent());
        // X 格不算横竖邻格
        assert!(!Position::new_unchecked(1, 1).is_corner_adjacent());
        assert!(!Position::new_unchecked(0, 0).is_corner_adjacent());
    }

    #[test]
    fn test_offset() {
        let pos = Position::new_unchecked(0, 0);
        assert_eq!(pos.offset(-1, 0), None);
        assert_eq!(pos.offset(1, 1), Some(Position::new_unchecked(1, 1)));
        assert_eq!(Position::new_unchecked(7, 7).offset(0, 1), None);
    }
}
