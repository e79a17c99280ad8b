//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::piece::{Coord, Piece, PieceKind, Side};

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 9x10 棋盘，索引为 rank * 9 + file，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; BOARD_WIDTH * BOARD_HEIGHT],
        }
    }

    /// 创建初始棋盘
    pub fn initial() -> Self {
        let mut board = Self::empty();

        // 底线：车马象士将士象马车，红黑对称
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Rook,
        ];
        for (file, kind) in back_rank.into_iter().enumerate() {
            let file = file as u8;
            board.set(
                Coord::new_unchecked(file, 0),
                Some(Piece::new(kind, Side::Red)),
            );
            board.set(
                Coord::new_unchecked(file, 9),
                Some(Piece::new(kind, Side::Black)),
            );
        }

        // 炮
        for file in [1, 7] {
            board.set(
                Coord::new_unchecked(file, 2),
                Some(Piece::new(PieceKind::Cannon, Side::Red)),
            );
            board.set(
                Coord::new_unchecked(file, 7),
                Some(Piece::new(PieceKind::Cannon, Side::Black)),
            );
        }

        // 兵/卒
        for file in (0..BOARD_WIDTH as u8).step_by(2) {
            board.set(
                Coord::new_unchecked(file, 3),
                Some(Piece::new(PieceKind::Soldier, Side::Red)),
            );
            board.set(
                Coord::new_unchecked(file, 6),
                Some(Piece::new(PieceKind::Soldier, Side::Black)),
            );
        }

        board
    }

    /// 获取指定坐标的棋子
    pub fn get(&self, coord: Coord) -> Option<Piece> {
        if coord.is_valid() {
            self.squares[coord.to_index()]
        } else {
            None
        }
    }

    /// 设置指定坐标的棋子
    pub fn set(&mut self, coord: Coord, piece: Option<Piece>) {
        if coord.is_valid() {
            self.squares[coord.to_index()] = piece;
        }
    }

    /// 移动棋子（不检查规则），返回被吃的棋子
    pub fn move_piece(&mut self, from: Coord, to: Coord) -> Option<Piece> {
        let piece = self.get(from);
        let captured = self.get(to);
        self.set(from, None);
        self.set(to, piece);
        captured
    }

    /// 查找指定阵营的将/帅坐标
    pub fn find_general(&self, side: Side) -> Option<Coord> {
        self.squares
            .iter()
            .position(|cell| {
                matches!(cell, Some(piece) if piece.kind == PieceKind::General && piece.side == side)
            })
            .and_then(Coord::from_index)
    }

    /// 获取指定阵营的所有棋子及其坐标
    pub fn pieces(&self, side: Side) -> Vec<(Coord, Piece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| match *cell {
                Some(piece) if piece.side == side => {
                    Coord::from_index(index).map(|coord| (coord, piece))
                }
                _ => None,
            })
            .collect()
    }

    /// 检查两个将是否在同一列面对面且中间无子（飞将）
    pub fn generals_facing(&self) -> bool {
        let (red, black) = match (self.find_general(Side::Red), self.find_general(Side::Black)) {
            (Some(red), Some(black)) => (red, black),
            _ => return false,
        };

        if red.file != black.file {
            return false;
        }

        let (low, high) = if red.rank < black.rank {
            (red.rank, black.rank)
        } else {
            (black.rank, red.rank)
        };

        ((low + 1)..high).all(|rank| self.get(Coord::new_unchecked(red.file, rank)).is_none())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}
