//! 中国象棋规则引擎
//!
//! 包含:
//! - 棋子、棋盘、坐标等核心数据结构
//! - 走法生成和规则验证
//! - 将军、将死、困毙判定
//! - 对局流程控制 (Game)
//! - 棋谱格式 (FEN)

mod board;
mod constants;
mod error;
mod fen;
mod game;
mod moves;
mod piece;

pub use board::Board;
pub use constants::*;
pub use error::{Result, RuleError};
pub use fen::{Fen, INITIAL_FEN};
pub use game::{Game, GameStatus};
pub use moves::{Move, MoveGenerator};
pub use piece::{Coord, Piece, PieceKind, Side};
