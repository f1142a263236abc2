//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;
use crate::disc::{Position, Side};

/// 单个格子：`None` 为空
pub type Cell = Option<Side>;

/// 棋盘
///
/// 8x8 值类型，按值传递；搜索的每一层都持有自己的副本。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// 索引为 [row][col]
    squares: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// 创建初始棋盘（中央四子，D4/E5 为白，E4/D5 为黑）
    pub fn initial() -> Self {
        let mut board = Self::empty();
        let m = (BOARD_SIZE / 2) as u8;
        board.set(Position::new_unchecked(m - 1, m - 1), Some(Side::White));
        board.set(Position::new_unchecked(m, m), Some(Side::White));
        board.set(Position::new_unchecked(m - 1, m), Some(Side::Black));
        board.set(Position::new_unchecked(m, m - 1), Some(Side::Black));
        board
    }

    /// 获取指定位置的格子
    pub fn get(&self, pos: Position) -> Cell {
        if pos.is_valid() {
            self.squares[pos.row as usize][pos.col as usize]
        } else {
            None
        }
    }

    /// 设置指定位置的格子
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if pos.is_valid() {
            self.squares[pos.row as usize][pos.col as usize] = cell;
        }
    }

    /// 指定位置是否为空
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// 指定阵营的棋子数
    pub fn count(&self, side: Side) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|cell| **cell == Some(side))
            .count()
    }

    /// 空格数
    pub fn empty_count(&self) -> usize {
        self.squares.iter().flatten().filter(|cell| cell.is_none()).count()
    }

    /// 棋子总数
    pub fn disc_count(&self) -> usize {
        BOARD_SIZE * BOARD_SIZE - self.empty_count()
    }

    /// 棋盘是否已满
    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    /// 终端显示：列 A-H，行 1-8，`●` 黑 `○` 白 `·` 空
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "   A B C D E F G H")?;
        for row in 0..BOARD_SIZE as u8 {
            write!(f, "{:>2}", row + 1)?;
            for col in 0..BOARD_SIZE as u8 {
                let c = match self.get(Position::new_unchecked(row, col)) {
                    Some(Side::Black) => '●',
                    Some(Side::White) => '○',
                    None => '·',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// 对局状态（由回合驱动方持有，核心不保存）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub current_turn: Side,
    /// 先手方
    pub first_player: Side,
    /// 连续停着次数（双方各停一次即终局）
    pub consecutive_passes: u32,
    /// 已落子数
    pub ply: u32,
}

impl BoardState {
    /// 创建初始状态
    pub fn new(first_player: Side) -> Self {
        Self {
            board: Board::initial(),
            current_turn: first_player,
            first_player,
            consecutive_passes: 0,
            ply: 0,
        }
    }

    /// 从棋盘创建状态
    pub fn from_board(board: Board, current_turn: Side) -> Self {
        Self {
            board,
            current_turn,
            first_player: current_turn,
            consecutive_passes: 0,
            ply: 0,
        }
    }

    /// 落子后更新棋盘并切换走子方
    pub fn commit(&mut self, board: Board) {
        self.board = board;
        self.ply += 1;
        self.consecutive_passes = 0;
        self.current_turn = self.current_turn.opponent();
    }

    /// 停着（无合法走法），切换走子方
    pub fn pass(&mut self) {
        self.consecutive_passes += 1;
        self.current_turn = self.current_turn.opponent();
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(Side::Black)
    }
}
