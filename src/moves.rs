//! 走法生成和将军判定

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{Coord, Piece, PieceKind, Side};

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起点
    pub from: Coord,
    /// 终点
    pub to: Coord,
    /// 被吃的棋子（如果有）
    pub captured: Option<Piece>,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Coord, to: Coord) -> Self {
        Self {
            from,
            to,
            captured: None,
        }
    }

    /// 创建带吃子的走法
    pub fn with_capture(from: Coord, to: Coord, captured: Piece) -> Self {
        Self {
            from,
            to,
            captured: Some(captured),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成单个棋子的原始走法（几何规则 + 同色过滤，不考虑将军）
    pub fn generate_raw(board: &Board, from: Coord, piece: Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        Self::generate_piece_moves(board, from, piece, &mut moves);
        moves
    }

    /// 生成指定阵营的所有原始走法
    pub fn generate_pseudo_legal(board: &Board, side: Side) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (coord, piece) in board.pieces(side) {
            Self::generate_piece_moves(board, coord, piece, &mut moves);
        }
        moves
    }

    /// 生成指定阵营的所有合法走法（过滤掉走后被将军的走法）
    pub fn generate_legal(board: &Board, side: Side) -> Vec<Move> {
        Self::generate_pseudo_legal(board, side)
            .into_iter()
            .filter(|mv| !Self::leaves_in_check(board, *mv, side))
            .collect()
    }

    /// 在副本上模拟走法，检查走完后己方是否被将军
    pub fn leaves_in_check(board: &Board, mv: Move, side: Side) -> bool {
        let mut probe = board.clone();
        probe.move_piece(mv.from, mv.to);
        Self::is_in_check(&probe, side)
    }

    /// 检查指定阵营是否被将军
    ///
    /// 飞将局面双方同时算被将军；其余情况扫描对方所有棋子的
    /// 原始走法，命中本方将的坐标即被将军。
    pub fn is_in_check(board: &Board, side: Side) -> bool {
        if board.generals_facing() {
            return true;
        }

        let general = match board.find_general(side) {
            Some(coord) => coord,
            None => return false,
        };

        board
            .pieces(side.opponent())
            .into_iter()
            .any(|(from, piece)| {
                Self::generate_raw(board, from, piece)
                    .into_iter()
                    .any(|mv| mv.to == general)
            })
    }

    /// 检查是否被将死
    pub fn is_checkmate(board: &Board, side: Side) -> bool {
        Self::is_in_check(board, side) && Self::generate_legal(board, side).is_empty()
    }

    /// 检查是否困毙（无子可动但未被将军）
    pub fn is_stalemate(board: &Board, side: Side) -> bool {
        !Self::is_in_check(board, side) && Self::generate_legal(board, side).is_empty()
    }

    /// 生成指定棋子的原始走法
    fn generate_piece_moves(board: &Board, from: Coord, piece: Piece, moves: &mut Vec<Move>) {
        match piece.kind {
            PieceKind::General => Self::generate_general_moves(board, from, piece.side, moves),
            PieceKind::Advisor => Self::generate_advisor_moves(board, from, piece.side, moves),
            PieceKind::Elephant => Self::generate_elephant_moves(board, from, piece.side, moves),
            PieceKind::Horse => Self::generate_horse_moves(board, from, piece.side, moves),
            PieceKind::Rook => Self::generate_rook_moves(board, from, piece.side, moves),
            PieceKind::Cannon => Self::generate_cannon_moves(board, from, piece.side, moves),
            PieceKind::Soldier => Self::generate_soldier_moves(board, from, piece.side, moves),
        }
    }

    /// 生成将/帅的走法：九宫格内直走一格
    fn generate_general_moves(board: &Board, from: Coord, side: Side, moves: &mut Vec<Move>) {
        for (df, dr) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
            if let Some(to) = from.offset(df, dr) {
                if !to.is_in_palace(side) {
                    continue;
                }
                Self::try_add_move(board, from, to, side, moves);
            }
        }
    }

    /// 生成士/仕的走法：在九宫中心和四角之间斜走
    fn generate_advisor_moves(board: &Board, from: Coord, side: Side, moves: &mut Vec<Move>) {
        for &to in Self::advisor_targets(from, side) {
            Self::try_add_move(board, from, to, side, moves);
        }
    }

    /// 士的固定目标表：中心通四角，四角只通中心
    fn advisor_targets(from: Coord, side: Side) -> &'static [Coord] {
        const RED_CORNERS: [Coord; 4] = [
            Coord::new_unchecked(3, 0),
            Coord::new_unchecked(5, 0),
            Coord::new_unchecked(3, 2),
            Coord::new_unchecked(5, 2),
        ];
        const RED_CENTER: [Coord; 1] = [Coord::new_unchecked(4, 1)];
        const BLACK_CORNERS: [Coord; 4] = [
            Coord::new_unchecked(3, 7),
            Coord::new_unchecked(5, 7),
            Coord::new_unchecked(3, 9),
            Coord::new_unchecked(5, 9),
        ];
        const BLACK_CENTER: [Coord; 1] = [Coord::new_unchecked(4, 8)];

        match side {
            Side::Red => match (from.file, from.rank) {
                (4, 1) => &RED_CORNERS,
                (3, 0) | (5, 0) | (3, 2) | (5, 2) => &RED_CENTER,
                _ => &[],
            },
            Side::Black => match (from.file, from.rank) {
                (4, 8) => &BLACK_CORNERS,
                (3, 7) | (5, 7) | (3, 9) | (5, 9) => &BLACK_CENTER,
                _ => &[],
            },
        }
    }

    /// 生成象/相的走法：走田字，塞象眼不通，不过河
    fn generate_elephant_moves(board: &Board, from: Coord, side: Side, moves: &mut Vec<Move>) {
        let jumps = [(2, 2), (2, -2), (-2, 2), (-2, -2)];
        let eyes = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

        for ((df, dr), (ef, er)) in jumps.into_iter().zip(eyes) {
            match from.offset(ef, er) {
                Some(eye) if board.get(eye).is_none() => {}
                _ => continue,
            }

            if let Some(to) = from.offset(df, dr) {
                if to.beyond_river(side) {
                    continue;
                }
                Self::try_add_move(board, from, to, side, moves);
            }
        }
    }

    /// 生成马/傌的走法：走日字，蹩马腿不通
    fn generate_horse_moves(board: &Board, from: Coord, side: Side, moves: &mut Vec<Move>) {
        // 8 个日字方向和各自的马腿
        let jumps = [
            ((1, 2), (0, 1)),
            ((2, 1), (1, 0)),
            ((2, -1), (1, 0)),
            ((1, -2), (0, -1)),
            ((-1, -2), (0, -1)),
            ((-2, -1), (-1, 0)),
            ((-2, 1), (-1, 0)),
            ((-1, 2), (0, 1)),
        ];

        for ((df, dr), (lf, lr)) in jumps {
            match from.offset(lf, lr) {
                Some(leg) if board.get(leg).is_none() => {}
                _ => continue,
            }

            if let Some(to) = from.offset(df, dr) {
                Self::try_add_move(board, from, to, side, moves);
            }
        }
    }

    /// 生成车/俥的走法：直线走到底，撞子即止
    fn generate_rook_moves(board: &Board, from: Coord, side: Side, moves: &mut Vec<Move>) {
        for (df, dr) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
            let mut current = from;
            while let Some(to) = current.offset(df, dr) {
                if board.get(to).is_some() {
                    // 第一个挡路的棋子，是敌子则可吃
                    Self::try_add_move(board, from, to, side, moves);
                    break;
                }
                moves.push(Move::new(from, to));
                current = to;
            }
        }
    }

    /// 生成炮/砲的走法：平移同车，吃子需隔一个炮架
    fn generate_cannon_moves(board: &Board, from: Coord, side: Side, moves: &mut Vec<Move>) {
        for (df, dr) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
            let mut current = from;
            let mut screened = false;

            while let Some(to) = current.offset(df, dr) {
                match (board.get(to), screened) {
                    // 炮架之前的空位可以走
                    (None, false) => moves.push(Move::new(from, to)),
                    (None, true) => {}
                    // 第一个棋子作为炮架
                    (Some(_), false) => screened = true,
                    // 炮架之后的第一个棋子，是敌子则可吃
                    (Some(_), true) => {
                        Self::try_add_move(board, from, to, side, moves);
                        break;
                    }
                }
                current = to;
            }
        }
    }

    /// 生成兵/卒的走法：过河前只进，过河后可横移，永不后退
    fn generate_soldier_moves(board: &Board, from: Coord, side: Side, moves: &mut Vec<Move>) {
        let forward = match side {
            Side::Red => 1,
            Side::Black => -1,
        };

        if let Some(to) = from.offset(0, forward) {
            Self::try_add_move(board, from, to, side, moves);
        }

        if from.beyond_river(side) {
            for df in [-1, 1] {
                if let Some(to) = from.offset(df, 0) {
                    Self::try_add_move(board, from, to, side, moves);
                }
            }
        }
    }

    /// 尝试添加走法：目标为空或敌子时加入，己方棋子过滤掉
    fn try_add_move(board: &Board, from: Coord, to: Coord, side: Side, moves: &mut Vec<Move>) {
        match board.get(to) {
            Some(target) if target.side != side => moves.push(Move::with_capture(from, to, target)),
            Some(_) => {}
            None => moves.push(Move::new(from, to)),
        }
    }
}
