//! FEN 格式解析和生成
//!
//! 中国象棋 FEN 格式：`<棋盘> <走子方>`，走子方缺省为红方，
//! 多余的尾部字段（步数计数等）忽略。
//!
//! 示例：
//! `rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR r`

use crate::board::Board;
use crate::error::RuleError;
use crate::piece::{Coord, Piece, Side};

/// 初始局面 FEN
pub const INITIAL_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR r";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为棋盘和走子方
    pub fn parse(fen: &str) -> Result<(Board, Side), RuleError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(RuleError::InvalidFen {
                reason: "empty FEN string".to_string(),
            });
        }

        let board = Self::parse_board(parts[0])?;

        let side = match parts.get(1) {
            Some(part) => part
                .chars()
                .next()
                .and_then(Side::from_fen_char)
                .ok_or_else(|| RuleError::InvalidFen {
                    reason: format!("invalid side to move: {}", part),
                })?,
            None => Side::Red,
        };

        Ok((board, side))
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board, RuleError> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != 10 {
            return Err(RuleError::InvalidFen {
                reason: format!("expected 10 rows, got {}", rows.len()),
            });
        }

        // FEN 行从上到下对应 rank 9 到 rank 0
        for (row_idx, row) in rows.iter().enumerate() {
            let rank = 9 - row_idx as u8;
            let mut file = 0u8;

            for c in row.chars() {
                if file >= 9 {
                    return Err(RuleError::InvalidFen {
                        reason: format!("row {} has too many columns", row_idx),
                    });
                }

                if c.is_ascii_digit() {
                    // 连续空位的数量
                    file += c as u8 - b'0';
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    board.set(Coord::new_unchecked(file, rank), Some(piece));
                    file += 1;
                } else {
                    return Err(RuleError::InvalidFen {
                        reason: format!("invalid piece character: {}", c),
                    });
                }
            }

            if file != 9 {
                return Err(RuleError::InvalidFen {
                    reason: format!("row {} has {} columns, expected 9", row_idx, file),
                });
            }
        }

        Ok(board)
    }

    /// 将局面编码为 FEN 字符串
    pub fn to_string(board: &Board, side: Side) -> String {
        format!("{} {}", Self::board_to_string(board), side.to_fen_char())
    }

    /// 将棋盘编码为 FEN 棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(10);

        // 从 rank 9 到 rank 0
        for rank in (0..10).rev() {
            let mut row = String::new();
            let mut empty_run = 0;

            for file in 0..9 {
                if let Some(piece) = board.get(Coord::new_unchecked(file, rank)) {
                    if empty_run > 0 {
                        row.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty_run += 1;
                }
            }

            if empty_run > 0 {
                row.push_str(&empty_run.to_string());
            }

            rows.push(row);
        }

        rows.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    #[test]
    fn test_parse_initial_fen() {
        let (board, side) = Fen::parse(INITIAL_FEN).unwrap();

        assert_eq!(side, Side::Red);
        // 与程序式初始布局逐格一致
        assert_eq!(board, Board::initial());
    }

    #[test]
    fn test_initial_fen_roundtrip() {
        let (board, side) = Fen::parse(INITIAL_FEN).unwrap();
        assert_eq!(Fen::to_string(&board, side), INITIAL_FEN);
    }

    #[test]
    fn test_parse_custom_fen() {
        let (board, side) = Fen::parse("4k4/9/9/9/9/9/9/9/9/4K4 b").unwrap();

        assert_eq!(side, Side::Black);
        assert_eq!(
            board.find_general(Side::Red),
            Some(Coord::new_unchecked(4, 0))
        );
        assert_eq!(
            board.find_general(Side::Black),
            Some(Coord::new_unchecked(4, 9))
        );
        assert_eq!(board.pieces(Side::Red).len(), 1);
        assert_eq!(board.pieces(Side::Black).len(), 1);
    }

    #[test]
    fn test_parse_defaults_to_red() {
        let (_, side) = Fen::parse("4k4/9/9/9/9/9/9/9/9/4K4").unwrap();
        assert_eq!(side, Side::Red);
    }

    #[test]
    fn test_parse_ignores_trailing_fields() {
        // 兼容带步数计数的长格式
        let (board, side) = Fen::parse("4k4/9/9/9/9/9/9/9/9/4K4 b 10 5").unwrap();
        assert_eq!(side, Side::Black);
        assert_eq!(board.pieces(Side::Black).len(), 1);
    }

    #[test]
    fn test_sparse_board_to_string() {
        let mut board = Board::empty();
        board.set(
            Coord::new_unchecked(4, 0),
            Some(Piece::new(PieceKind::General, Side::Red)),
        );

        assert_eq!(
            Fen::to_string(&board, Side::Red),
            "9/9/9/9/9/9/9/9/9/4K4 r"
        );
    }

    #[test]
    fn test_invalid_fen() {
        // 行数不对
        assert!(Fen::parse("4k4/9/9").is_err());

        // 列数超出
        assert!(Fen::parse("4k44/9/9/9/9/9/9/9/9/4K4 r").is_err());

        // 列数不足
        assert!(Fen::parse("4k3/9/9/9/9/9/9/9/9/4K4 r").is_err());

        // 无效字符
        assert!(Fen::parse("4x4/9/9/9/9/9/9/9/9/4K4 r").is_err());

        // 无效走子方
        assert!(Fen::parse("4k4/9/9/9/9/9/9/9/9/4K4 x").is_err());

        // 空串
        assert!(Fen::parse("").is_err());
    }
}
