//! 对局控制

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::error::{Result, RuleError};
use crate::fen::Fen;
use crate::moves::{Move, MoveGenerator};
use crate::piece::{Coord, PieceKind, Side};

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// 进行中
    InProgress,
    /// 一方获胜
    Won(Side),
}

/// 对局控制器
///
/// 维护棋盘、走子方、胜负状态和双方的将军标记，
/// 所有走法都经过完整的规则校验后才落子。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Side,
    status: GameStatus,
    red_in_check: bool,
    black_in_check: bool,
}

impl Game {
    /// 创建新对局（标准开局，红方先行）
    pub fn new() -> Self {
        Self {
            board: Board::initial(),
            turn: Side::Red,
            status: GameStatus::InProgress,
            red_in_check: false,
            black_in_check: false,
        }
    }

    /// 从 FEN 局面创建对局
    ///
    /// 双方必须各有且只有一个将；载入的局面若已无子可动，
    /// 状态立即结算为对方获胜。
    pub fn from_fen(fen: &str) -> Result<Self> {
        let (board, turn) = Fen::parse(fen)?;

        for side in [Side::Red, Side::Black] {
            let generals = board
                .pieces(side)
                .into_iter()
                .filter(|(_, piece)| piece.kind == PieceKind::General)
                .count();
            if generals != 1 {
                return Err(RuleError::InvalidFen {
                    reason: format!("expected exactly one {:?} general, found {}", side, generals),
                });
            }
        }

        let mut game = Self {
            board,
            turn,
            status: GameStatus::InProgress,
            red_in_check: false,
            black_in_check: false,
        };
        game.refresh_check(Side::Red);
        game.refresh_check(Side::Black);

        if MoveGenerator::generate_legal(&game.board, game.turn).is_empty() {
            game.status = GameStatus::Won(game.turn.opponent());
        }

        Ok(game)
    }

    /// 获取棋盘快照
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 获取当前走子方
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// 获取对局状态
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// 查询一方当前是否被将军
    pub fn is_in_check(&self, side: Side) -> bool {
        match side {
            Side::Red => self.red_in_check,
            Side::Black => self.black_in_check,
        }
    }

    /// 当前走子方的所有合法走法
    pub fn legal_moves(&self) -> Vec<Move> {
        match self.status {
            GameStatus::InProgress => MoveGenerator::generate_legal(&self.board, self.turn),
            GameStatus::Won(_) => Vec::new(),
        }
    }

    /// 尝试走子，坐标为 `<列字母><行数字>` 文本形式（如 `e1`、`a10`）
    ///
    /// 返回走法是否被执行；所有失败统一返回 false，棋盘不变。
    pub fn attempt_move(&mut self, source: &str, destination: &str) -> bool {
        let parsed = source
            .parse::<Coord>()
            .and_then(|from| destination.parse::<Coord>().map(|to| (from, to)));

        let (from, to) = match parsed {
            Ok(pair) => pair,
            Err(err) => {
                debug!("坐标解析失败: {}", err);
                return false;
            }
        };

        match self.try_move(from, to) {
            Ok(()) => true,
            Err(err) => {
                debug!("走法被拒绝 {} -> {}: {}", from, to, err);
                false
            }
        }
    }

    /// 校验并执行一步走子，失败时返回具体原因
    pub fn try_move(&mut self, from: Coord, to: Coord) -> Result<()> {
        if self.status != GameStatus::InProgress {
            return Err(RuleError::GameOver);
        }

        let piece = self
            .board
            .get(from)
            .ok_or(RuleError::EmptySource { coord: from })?;
        if piece.side != self.turn {
            return Err(RuleError::NotYourTurn);
        }

        let raw = MoveGenerator::generate_raw(&self.board, from, piece);
        let mv = raw
            .iter()
            .copied()
            .find(|mv| mv.to == to)
            .ok_or(RuleError::IllegalDestination { from, to })?;

        // 整个原始走法集过一遍自杀过滤，再看目标是否幸存
        let legal: Vec<Move> = raw
            .into_iter()
            .filter(|mv| !MoveGenerator::leaves_in_check(&self.board, *mv, self.turn))
            .collect();
        if !legal.contains(&mv) {
            return Err(RuleError::ExposesGeneral);
        }

        self.commit(mv);
        Ok(())
    }

    /// 落子并推进对局状态
    fn commit(&mut self, mv: Move) {
        let mover = self.turn;
        let captured = self.board.move_piece(mv.from, mv.to);

        if let Some(piece) = captured {
            debug!("{:?} 吃子 {:?}: {}", mover, piece.kind, mv);
        } else {
            debug!("{:?} 走子: {}", mover, mv);
        }

        // 每步走完重新计算双方的将军标记
        self.refresh_check(mover);
        self.turn = mover.opponent();
        self.refresh_check(self.turn);

        // 新走子方无合法走法即判负，将死与困毙同等处理
        if MoveGenerator::generate_legal(&self.board, self.turn).is_empty() {
            self.status = GameStatus::Won(mover);
            info!("对局结束: {:?} 胜", mover);
        }
    }

    fn refresh_check(&mut self, side: Side) {
        let flag = MoveGenerator::is_in_check(&self.board, side);
        match side {
            Side::Red => self.red_in_check = flag,
            Side::Black => self.black_in_check = flag,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = Game::new();

        assert_eq!(game.turn(), Side::Red);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(!game.is_in_check(Side::Red));
        assert!(!game.is_in_check(Side::Black));
        assert_eq!(*game.board(), Board::initial());
        assert_eq!(game.legal_moves().len(), 44);
    }

    #[test]
    fn test_opening_exchange() {
        let mut game = Game::new();

        // 红兵前进一步
        assert!(game.attempt_move("e4", "e5"));
        assert_eq!(game.turn(), Side::Black);
        assert!(!game.is_in_check(Side::Red));
        assert!(!game.is_in_check(Side::Black));

        // 轮到黑方，动刚才那个红兵被拒绝，局面不变
        let before = game.board().clone();
        assert!(!game.attempt_move("e5", "e4"));
        assert_eq!(*game.board(), before);
        assert_eq!(game.turn(), Side::Black);
    }

    #[test]
    fn test_malformed_coordinates_rejected() {
        let mut game = Game::new();

        for (from, to) in [
            ("z1", "e2"),
            ("e0", "e1"),
            ("e11", "e10"),
            ("", "e2"),
            ("e4", ""),
            ("e4", "4e"),
        ] {
            assert!(!game.attempt_move(from, to), "accepted {:?} -> {:?}", from, to);
        }
        assert_eq!(*game.board(), Board::initial());
    }

    #[test]
    fn test_try_move_errors() {
        let mut game = Game::new();

        // 起点为空
        assert_eq!(
            game.try_move(Coord::new_unchecked(4, 4), Coord::new_unchecked(4, 5)),
            Err(RuleError::EmptySource {
                coord: Coord::new_unchecked(4, 4)
            })
        );

        // 动对方的子
        assert_eq!(
            game.try_move(Coord::new_unchecked(4, 6), Coord::new_unchecked(4, 5)),
            Err(RuleError::NotYourTurn)
        );

        // 不符合棋子走法
        assert_eq!(
            game.try_move(Coord::new_unchecked(4, 0), Coord::new_unchecked(4, 2)),
            Err(RuleError::IllegalDestination {
                from: Coord::new_unchecked(4, 0),
                to: Coord::new_unchecked(4, 2)
            })
        );
    }

    #[test]
    fn test_exposes_general_rejected() {
        let mut game = Game::from_fen("4k4/9/9/9/9/9/9/9/4R4/4K4 r").unwrap();

        // 车是两将之间唯一的子，离开中线就飞将
        assert_eq!(
            game.try_move(Coord::new_unchecked(4, 1), Coord::new_unchecked(3, 1)),
            Err(RuleError::ExposesGeneral)
        );

        // 沿中线走合法
        assert!(game
            .try_move(Coord::new_unchecked(4, 1), Coord::new_unchecked(4, 5))
            .is_ok());
        assert_eq!(game.turn(), Side::Black);
    }

    #[test]
    fn test_failed_attempts_leave_board_identical() {
        let mut game = Game::new();
        let before = serde_json::to_string(game.board()).unwrap();

        assert!(!game.attempt_move("e1", "e3"));
        assert!(!game.attempt_move("a7", "a6"));

        let after = serde_json::to_string(game.board()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_checkmate_flow() {
        let mut game = Game::from_fen("3k5/R3R4/9/9/9/9/9/9/9/4K4 r").unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(!game.is_in_check(Side::Black));

        // 左车平中路，黑将无处可逃
        assert!(game.attempt_move("a9", "d9"));
        assert_eq!(game.status(), GameStatus::Won(Side::Red));
        assert!(game.is_in_check(Side::Black));

        // 终局后任何走法都被拒绝
        assert!(!game.attempt_move("d10", "e10"));
        assert_eq!(
            game.try_move(Coord::new_unchecked(3, 9), Coord::new_unchecked(4, 9)),
            Err(RuleError::GameOver)
        );
    }

    #[test]
    fn test_stalemate_flow() {
        let mut game = Game::from_fen("3k5/9/9/9/9/4R4/9/9/9/4K4 r").unwrap();

        // 车封住黑将的两个落点；黑方未被将军但无子可动，同样判负
        assert!(game.attempt_move("e5", "e9"));
        assert_eq!(game.status(), GameStatus::Won(Side::Red));
        assert!(!game.is_in_check(Side::Black));
    }

    #[test]
    fn test_from_fen_terminal_position() {
        // 载入已是绝杀的局面，状态立即结算
        let game = Game::from_fen("3k5/3RR4/9/9/9/9/9/9/9/4K4 b").unwrap();
        assert_eq!(game.status(), GameStatus::Won(Side::Red));
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn test_from_fen_requires_one_general_per_side() {
        // 缺将
        assert!(Game::from_fen("9/9/9/9/9/9/9/9/9/4K4 r").is_err());
        assert!(Game::from_fen("4k4/9/9/9/9/9/9/9/9/9 r").is_err());

        // 多将
        assert!(Game::from_fen("3kk4/9/9/9/9/9/9/9/9/4K4 r").is_err());
    }

    #[test]
    fn test_game_snapshot_roundtrip() {
        let mut game = Game::new();
        assert!(game.attempt_move("e4", "e5"));
        assert!(game.attempt_move("e7", "e6"));

        let json = serde_json::to_string(&game).unwrap();
        let restored: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, game);
    }
}
