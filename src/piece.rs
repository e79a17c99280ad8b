//! 棋子和坐标定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::RuleError;

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 红方（先手，在下方）
    Red,
    /// 黑方（后手，在上方）
    Black,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::Red => 'r',
            Side::Black => 'b',
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Side> {
        match c {
            'r' | 'R' => Some(Side::Red),
            'b' | 'B' => Some(Side::Black),
            _ => None,
        }
    }
}

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 将/帅
    General,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 马/傌
    Horse,
    /// 车/俥
    Rook,
    /// 炮/砲
    Cannon,
    /// 兵/卒
    Soldier,
}

impl PieceKind {
    /// 获取 FEN 字符（红方大写，黑方小写）
    pub fn to_fen_char(&self, side: Side) -> char {
        let c = match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Rook => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        };
        match side {
            Side::Red => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceKind, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::Red
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::General,
            'a' => PieceKind::Advisor,
            'b' => PieceKind::Elephant,
            'n' => PieceKind::Horse,
            'r' => PieceKind::Rook,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => return None,
        };
        Some((kind, side))
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.kind.to_fen_char(self.side)
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceKind::from_fen_char(c).map(|(kind, side)| Piece { kind, side })
    }
}

/// 棋盘坐标
///
/// 列从红方左侧的 `a` 数到 `i`，行从红方底线的 `1` 数到 `10`。
/// 内部存储为 0 起始的整数对。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// 列 (0-8)
    pub file: u8,
    /// 行 (0-9)，0 为红方底线
    pub rank: u8,
}

impl Coord {
    /// 创建新坐标
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if (file as usize) < BOARD_WIDTH && (rank as usize) < BOARD_HEIGHT {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// 创建新坐标（不检查边界，内部使用）
    pub const fn new_unchecked(file: u8, rank: u8) -> Self {
        Self { file, rank }
    }

    /// 检查坐标是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.file as usize) < BOARD_WIDTH && (self.rank as usize) < BOARD_HEIGHT
    }

    /// 检查坐标是否在指定阵营的九宫格内
    pub fn is_in_palace(&self, side: Side) -> bool {
        let in_file = (3..=5).contains(&self.file);
        let in_rank = match side {
            Side::Red => (0..=2).contains(&self.rank),
            Side::Black => (7..=9).contains(&self.rank),
        };
        in_file && in_rank
    }

    /// 检查坐标是否已在指定阵营的对岸（过河）
    pub fn beyond_river(&self, side: Side) -> bool {
        match side {
            Side::Red => self.rank >= 5,
            Side::Black => self.rank <= 4,
        }
    }

    /// 获取偏移后的坐标，出界返回 None
    pub fn offset(&self, df: i8, dr: i8) -> Option<Coord> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if file >= 0 && (file as usize) < BOARD_WIDTH && rank >= 0 && (rank as usize) < BOARD_HEIGHT
        {
            Some(Coord {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// 转换为棋盘数组索引
    pub fn to_index(&self) -> usize {
        self.rank as usize * BOARD_WIDTH + self.file as usize
    }

    /// 从棋盘数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_WIDTH * BOARD_HEIGHT {
            Some(Coord {
                file: (index % BOARD_WIDTH) as u8,
                rank: (index / BOARD_WIDTH) as u8,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl FromStr for Coord {
    type Err = RuleError;

    /// 解析 `<列字母><行数字>` 形式的坐标，如 `e1`、`a10`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RuleError::MalformedCoord {
            input: s.to_string(),
        };

        let mut chars = s.chars();
        let file = match chars.next().map(|c| c.to_ascii_lowercase()) {
            Some(c @ 'a'..='i') => c as u8 - b'a',
            _ => return Err(malformed()),
        };

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let rank: u8 = digits.parse().map_err(|_| malformed())?;
        if !(1..=10).contains(&rank) {
            return Err(malformed());
        }

        Ok(Coord {
            file,
            rank: rank - 1,
        })
    }
}
