//! 棋盘文本格式解析和生成
//!
//! 格式：`<棋盘> <走子方>`
//!
//! - 棋盘为 8 行，用 `/` 分隔，第一行为第 1 行（A1-H1）
//! - `B`/`X` 黑子，`W`/`O` 白子，`.`/`-` 空格，数字 1-8 表示连续空格
//! - 走子方为 `b` 或 `w`，省略时为黑方
//!
//! 示例（初始局面）：
//! `8/8/8/3WB3/3BW3/8/8/8 b`

use crate::board::{Board, BoardState};
use crate::constants::BOARD_SIZE;
use crate::disc::{Position, Side};
use crate::error::ReversiError;

/// 初始局面
pub const INITIAL_LAYOUT: &str = "8/8/8/3WB3/3BW3/8/8/8 b";

/// 棋盘文本格式处理
pub struct Layout;

impl Layout {
    /// 解析为对局状态
    pub fn parse(text: &str) -> Result<BoardState, ReversiError> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ReversiError::InvalidLayout {
                reason: "Empty layout string".to_string(),
            });
        }

        let board = Self::parse_board(parts[0])?;

        let current_turn = match parts.get(1) {
            Some(s) => {
                let c = s.chars().next().unwrap_or('b');
                Side::from_char(c).ok_or_else(|| ReversiError::InvalidLayout {
                    reason: format!("Invalid side character: {}", c),
                })?
            }
            None => Side::Black,
        };

        Ok(BoardState::from_board(board, current_turn))
    }

    /// 解析棋盘部分
    pub fn parse_board(board_str: &str) -> Result<Board, ReversiError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(ReversiError::InvalidLayout {
                reason: format!("Expected {} rows, got {}", BOARD_SIZE, rows.len()),
            });
        }

        for (row_idx, row) in rows.iter().enumerate() {
            let mut col = 0usize;

            for c in row.chars() {
                if col >= BOARD_SIZE {
                    return Err(ReversiError::InvalidLayout {
                        reason: format!("Row {} has too many columns", row_idx + 1),
                    });
                }

                if let Some(n) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    col += n as usize;
                } else if c == '.' || c == '-' {
                    col += 1;
                } else if let Some(side) = Side::from_char(c) {
                    board.set(Position::new_unchecked(row_idx as u8, col as u8), Some(side));
                    col += 1;
                } else {
                    return Err(ReversiError::InvalidLayout {
                        reason: format!("Invalid cell character: {}", c),
                    });
                }
            }

            if col != BOARD_SIZE {
                return Err(ReversiError::InvalidLayout {
                    reason: format!(
                        "Row {} has {} columns, expected {}",
                        row_idx + 1,
                        col,
                        BOARD_SIZE
                    ),
                });
            }
        }

        Ok(board)
    }

    /// 将对局状态转换为文本
    pub fn to_string(state: &BoardState) -> String {
        format!(
            "{} {}",
            Self::board_to_string(&state.board),
            state.current_turn.to_char().to_ascii_lowercase()
        )
    }

    /// 将棋盘转换为文本（连续空格压缩为数字）
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for row in 0..BOARD_SIZE as u8 {
            let mut line = String::new();
            let mut empty_count = 0;

            for col in 0..BOARD_SIZE as u8 {
                if let Some(side) = board.get(Position::new_unchecked(row, col)) {
                    if empty_count > 0 {
                        line.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    line.push(side.to_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                line.push_str(&empty_count.to_string());
            }

            rows.push(line);
        }

        rows.join("/")
    }

    /// 解析初始局面
    pub fn initial() -> BoardState {
        BoardState::new(Side::Black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_initial_layout() {
        let state = Layout::parse(INITIAL_LAYOUT).unwrap();
        assert_eq!(state.current_turn, Side::Black);
        assert_eq!(state.board, Board::initial());
    }

    #[test]
    fn test_layout_roundtrip() {
        let state = Layout::initial();
        let text = Layout::to_string(&state);
        assert_eq!(text, INITIAL_LAYOUT);

        let state2 = Layout::parse(&text).unwrap();
        assert_eq!(state.board, state2.board);
        assert_eq!(state.current_turn, state2.current_turn);
    }

    #[test]
    fn test_parse_dotted_rows() {
        let state = Layout::parse(
            "B......./\
             ......../\
             ......../\
             ...WB.../\
             ...BW.../\
             ......../\
             ......../\
             .......W w",
        )
        .unwrap();

        assert_eq!(state.current_turn, Side::White);
        assert_eq!(state.board.get(Position::new_unchecked(0, 0)), Some(Side::Black));
        assert_eq!(state.board.get(Position::new_unchecked(7, 7)), Some(Side::White));
        assert_eq!(state.board.count(Side::Black), 3);
        assert_eq!(state.board.count(Side::White), 3);
    }

    #[test]
    fn test_invalid_layout() {
        // 行数不对
        assert!(Layout::parse("8/8/8").is_err());

        // 列数不对
        assert!(Layout::parse("9/8/8/8/8/8/8/8 b").is_err());
        assert!(Layout::parse("7/8/8/8/8/8/8/8 b").is_err());

        // 无效字符
        assert!(Layout::parse("8/8/8/3WQ3/3BW3/8/8/8 b").is_err());

        // 无效走子方
        assert!(Layout::parse("8/8/8/3WB3/3BW3/8/8/8 z").is_err());

        // 空字符串
        assert!(Layout::parse("   ").is_err());
    }
}
