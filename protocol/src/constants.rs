//! 规则常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 8;

/// 八个方向（行偏移, 列偏移）
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 四个角（行, 列）
pub const CORNERS: [(u8, u8); 4] = [(0, 0), (0, 7), (7, 0), (7, 7)];

/// X 格及其对应的角：((X 格), (角))
pub const X_SQUARES: [((u8, u8), (u8, u8)); 4] = [
    ((1, 1), (0, 0)),
    ((1, 6), (0, 7)),
    ((6, 1), (7, 0)),
    ((6, 6), (7, 7)),
];

/// 列字母（0 → A）
pub const COLUMN_LETTERS: [char; BOARD_SIZE] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
