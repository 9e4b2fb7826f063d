use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use uttt_mcts::{Action, ActiveSubboard, BoardState, GameState, Player, Status, UtttError};

// X wins sub-board (0,0) along its top row; O answers in the cells that
// send X back there.
const TOP_ROW_OF_CORNER: [u8; 5] = [1, 9, 2, 18, 0];

// X wins sub-boards (1,0), (1,1) and (1,2), completing the middle meta row
// on the last move. O wins (0,1) and (0,2) along the way.
const MIDDLE_META_ROW: [u8; 17] = [
    28, 12, 29, 21, 27, 4, 37, 13, 38, 22, 36, 5, 46, 14, 47, 23, 45,
];

// O wins sub-boards (0,0), (1,0) and (2,0), completing the left meta column
// on the last move.
const LEFT_META_COLUMN_FOR_O: [u8; 26] = [
    6, 59, 45, 8, 75, 35, 72, 4, 42, 62, 80, 74, 18, 0, 15, 56, 21, 33, 38, 22, 37, 17, 77, 50,
    48, 34,
];

// Every sub-board is won, X and O alternating so that no meta line forms.
const ALL_RESOLVED_NO_LINE: [u8; 44] = [
    11, 23, 48, 27, 4, 38, 26, 72, 7, 69, 62, 80, 79, 63, 3, 31, 37, 15, 61, 71, 73, 9, 8, 76,
    44, 70, 43, 35, 10, 12, 60, 20, 21, 5, 53, 19, 45, 1, 51, 39, 40, 0, 6, 18,
];

fn play(indices: &[u8]) -> BoardState {
    let mut board = BoardState::new();
    for &index in indices {
        board
            .apply(Action::from_index(index).unwrap())
            .unwrap_or_else(|e| panic!("action {index} should be legal: {e}"));
    }
    board
}

fn random_game(seed: u64) -> Vec<BoardState> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = BoardState::new();
    let mut history = vec![board.clone()];
    while !board.is_terminal() {
        let actions = board.legal_actions().unwrap();
        board.apply(*actions.choose(&mut rng).unwrap()).unwrap();
        history.push(board.clone());
    }
    history
}

#[test]
fn test_action_encoding() {
    let action = Action::new(1, 1, 1, 1).unwrap();
    assert_eq!(action.index(), 40);
    assert_eq!(action.subboard(), (1, 1));
    assert_eq!(action.cell(), (1, 1));

    let corner = Action::from_index(80).unwrap();
    assert_eq!(
        (corner.macro_row(), corner.macro_col(), corner.micro_row(), corner.micro_col()),
        (2, 2, 2, 2)
    );

    assert!(matches!(
        Action::from_index(81),
        Err(UtttError::IllegalAction { .. })
    ));
    assert!(Action::new(0, 3, 0, 0).is_err());
    assert_eq!(Action::all().count(), 81);
}

#[test]
fn test_empty_board() {
    let board = BoardState::new();
    assert_eq!(board.turn(), Player::X);
    assert_eq!(board.active_subboard(), ActiveSubboard::Any);
    assert_eq!(board.status(), Status::Open);
    assert_eq!(board.legal_actions().unwrap().len(), 81);
    assert_eq!(board.terminal_reward(), None);
}

#[test]
fn test_center_move_sends_opponent_to_center() {
    let board = play(&[40]);

    assert_eq!(board.active_subboard(), ActiveSubboard::At(1, 1));
    assert_eq!(board.turn(), Player::O);
    assert_eq!(board.cell(Action::from_index(40).unwrap()), Some(Player::X));

    let legal = board.legal_actions().unwrap();
    assert_eq!(legal.len(), 8);
    assert!(legal.iter().all(|a| a.subboard() == (1, 1)));
    assert!(!legal.contains(&Action::from_index(40).unwrap()));
}

#[test]
fn test_won_subboard_redirects_to_any() {
    let board = play(&TOP_ROW_OF_CORNER);

    assert_eq!(board.subboard_status(0, 0), Status::WonByX);
    // O was sent to (0,0), which is resolved.
    assert_eq!(board.active_subboard(), ActiveSubboard::Any);

    let legal = board.legal_actions().unwrap();
    assert_eq!(legal.len(), 70);
    assert!(legal.iter().all(|a| a.subboard() != (0, 0)));

    // Empty cells of a won sub-board stay unplayable.
    let empty_in_won = Action::new(0, 0, 2, 2).unwrap();
    assert_eq!(board.cell(empty_in_won), None);
    assert!(!board.is_legal(empty_in_won));
}

#[test]
fn test_meta_line_wins_the_game() {
    let board = play(&MIDDLE_META_ROW);

    assert_eq!(board.subboard_status(1, 0), Status::WonByX);
    assert_eq!(board.subboard_status(1, 1), Status::WonByX);
    assert_eq!(board.subboard_status(1, 2), Status::WonByX);
    assert_eq!(board.subboard_status(0, 1), Status::WonByO);
    assert_eq!(board.status(), Status::WonByX);
    assert_eq!(board.winner(), Some(Player::X));
    assert!(board.is_terminal());
    assert_eq!(board.terminal_reward(), Some(1.0));
}

#[test]
fn test_terminal_board_rejects_queries_and_moves() {
    let mut board = play(&MIDDLE_META_ROW);

    assert!(matches!(
        board.legal_actions(),
        Err(UtttError::InvalidState(_))
    ));

    let before = board.clone();
    let result = board.apply(Action::from_index(80).unwrap());
    assert!(matches!(result, Err(UtttError::IllegalAction { action: 80, .. })));
    assert_eq!(board, before);
}

#[test]
fn test_illegal_actions_leave_board_unchanged() {
    let mut board = play(&[40]);
    let before = board.clone();

    // Outside the active sub-board
    let err = board.apply(Action::from_index(0).unwrap()).unwrap_err();
    assert!(matches!(err, UtttError::IllegalAction { action: 0, .. }));
    // Already marked
    assert!(board.apply(Action::from_index(40).unwrap()).is_err());

    assert_eq!(board, before);
}

#[test]
fn test_replay_is_deterministic() {
    for seed in 0..5 {
        let history = random_game(seed);
        let final_board = history.last().unwrap();

        // Recover the action sequence from consecutive states and replay it.
        let mut replay = BoardState::new();
        for window in history.windows(2) {
            let action = Action::all()
                .find(|&a| window[0].cell(a).is_none() && window[1].cell(a).is_some())
                .unwrap();
            replay.apply(action).unwrap();
            assert_eq!(&replay, &window[1]);
        }
        assert_eq!(&replay, final_board);
    }
}

#[test]
fn test_legal_actions_respect_constraints() {
    for seed in 0..20 {
        for board in random_game(seed) {
            if board.is_terminal() {
                assert!(board.terminal_reward().is_some());
                continue;
            }
            let legal = board.legal_actions().unwrap();
            assert!(!legal.is_empty());
            assert!(legal.windows(2).all(|w| w[0] < w[1]));

            for action in legal {
                assert_eq!(board.cell(action), None);
                let (row, col) = action.subboard();
                assert_eq!(board.subboard_status(row, col), Status::Open);
                if let ActiveSubboard::At(r, c) = board.active_subboard() {
                    assert_eq!((r, c), (row, col));
                }
            }
        }
    }
}

#[test]
fn test_resolved_subboards_never_change() {
    for seed in 0..10 {
        let history = random_game(seed);
        for window in history.windows(2) {
            for row in 0..3 {
                for col in 0..3 {
                    let before = window[0].subboard_status(row, col);
                    if before.is_resolved() {
                        assert_eq!(window[1].subboard_status(row, col), before);
                    }
                }
            }
        }
    }
}

#[test]
fn test_random_games_report_consistent_rewards() {
    let mut x_wins = 0;
    for seed in 0..200 {
        let board = random_game(seed).pop().unwrap();
        let expected = match board.status() {
            Status::WonByX => 1.0,
            Status::WonByO => -1.0,
            Status::Drawn => 0.0,
            Status::Open => panic!("random game ended while open"),
        };
        assert_eq!(board.terminal_reward(), Some(expected));
        if board.status() == Status::WonByX {
            x_wins += 1;
        }
    }
    assert!(x_wins > 0, "expected at least one random X win in 200 games");
}

#[test]
fn test_game_state_interface_matches_board() {
    let board = play(&[40]);
    assert_eq!(GameState::current_player(&board), Player::O);
    assert_eq!(
        GameState::legal_actions(&board).unwrap(),
        board.legal_actions().unwrap()
    );

    let mut rng = StdRng::seed_from_u64(3);
    let reward = board.random_playout(&mut rng).unwrap();
    assert!([-1.0, 0.0, 1.0].contains(&reward));
}

#[test]
fn test_o_meta_line_wins() {
    let before_last = play(&LEFT_META_COLUMN_FOR_O[..25]);
    assert!(!before_last.is_terminal());
    assert_eq!(before_last.terminal_reward(), None);

    let board = play(&LEFT_META_COLUMN_FOR_O);
    assert!(board.is_terminal());
    assert_eq!(board.status(), Status::WonByO);
    assert_eq!(board.winner(), Some(Player::O));
    assert_eq!(board.terminal_reward(), Some(-1.0));
    for row in 0..3 {
        assert_eq!(board.subboard_status(row, 0), Status::WonByO);
    }
}

#[test]
fn test_all_subboards_resolved_without_line_is_a_draw() {
    let before_last = play(&ALL_RESOLVED_NO_LINE[..43]);
    assert_eq!(before_last.status(), Status::Open);

    let board = play(&ALL_RESOLVED_NO_LINE);
    assert!(board.is_terminal());
    assert_eq!(board.status(), Status::Drawn);
    assert_eq!(board.winner(), None);
    assert_eq!(board.terminal_reward(), Some(0.0));
    for row in 0..3 {
        for col in 0..3 {
            assert!(board.subboard_status(row, col).is_resolved());
        }
    }
    assert!(matches!(
        board.legal_actions(),
        Err(UtttError::InvalidState(_))
    ));
}
