//! 错误类型定义

use thiserror::Error;

use crate::piece::Coord;

/// 象棋规则错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// 坐标文本格式错误
    #[error("Malformed coordinate: {input:?}")]
    MalformedCoord { input: String },

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 起点没有棋子
    #[error("No piece at {coord}")]
    EmptySource { coord: Coord },

    /// 不是该方的回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 不符合棋子的走法规则
    #[error("Illegal destination: {from} -> {to}")]
    IllegalDestination { from: Coord, to: Coord },

    /// 走后己方被将军
    #[error("Move would leave the general in check")]
    ExposesGeneral,
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, RuleError>;
