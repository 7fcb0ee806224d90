#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use std::collections::HashSet;
    use std::io::Cursor;

    use crate::{
        analysis::analyse,
        prompt::{ask_first, ask_strategy},
        board::{Board, GameOutcome, Move, Player, LINES},
        session::{Session, Turn},
        solver::{first_available_move, Solver, MAX_SCORE, MIN_SCORE},
        strategy::Strategy,
        CELLS, SIZE,
    };

    // every one of the 3^9 cell combinations, reachable or not
    fn all_boards() -> Result<Vec<Board>> {
        let mut boards = Vec::with_capacity(3usize.pow(CELLS as u32));
        for index in 0..3usize.pow(CELLS as u32) {
            let mut text = String::new();
            let mut rest = index;
            for i in 0..CELLS {
                if i > 0 && i % SIZE == 0 {
                    text.push('/');
                }
                text.push(['_', 'X', 'O'][rest % 3]);
                rest /= 3;
            }
            boards.push(text.parse()?);
        }
        Ok(boards)
    }

    // every board that alternating play from the empty board can produce
    fn reachable_boards() -> Result<Vec<Board>> {
        let mut seen = HashSet::new();
        let mut stack = vec![Board::new()];
        let mut boards = vec![];
        while let Some(board) = stack.pop() {
            if !seen.insert(board) {
                continue;
            }
            boards.push(board);
            if board.outcome().is_terminal() {
                continue;
            }
            let player = side_to_move(&board);
            for position in board.empty_cells() {
                let mut next = board;
                next.play(position, player)?;
                stack.push(next);
            }
        }
        Ok(boards)
    }

    fn side_to_move(board: &Board) -> Player {
        if board.num_moves() % 2 == 0 {
            Player::X
        } else {
            Player::O
        }
    }

    fn relabel(board: &Board) -> Result<Board> {
        board
            .to_string()
            .chars()
            .map(|c| match c {
                'X' => 'O',
                'O' => 'X',
                other => other,
            })
            .collect::<String>()
            .parse()
    }

    #[test]
    pub fn parse_and_display() -> Result<()> {
        let board: Board = "X__/_O_/___".parse()?;
        assert_eq!(board.to_string(), "X__/_O_/___");
        assert_eq!(board.num_moves(), 2);

        let multiline: Board = "X..\n.O.\n...\n".parse()?;
        assert_eq!(board, multiline);

        assert!("X__/_O_".parse::<Board>().is_err());
        assert!("X__/_O_/__".parse::<Board>().is_err());
        assert!("X__/_Q_/___".parse::<Board>().is_err());
        Ok(())
    }

    #[test]
    pub fn play_rejects_taken_and_off_board_cells() -> Result<()> {
        let mut board = Board::new();
        board.play(Move::new(1, 1), Player::X)?;

        assert!(board.play(Move::new(1, 1), Player::O).is_err());
        assert!(board.play(Move::new(3, 0), Player::O).is_err());
        assert!(board.play(Move::new(0, 3), Player::O).is_err());
        assert_eq!(board.num_moves(), 1);
        Ok(())
    }

    #[test]
    pub fn every_line_wins() -> Result<()> {
        for line in LINES.iter() {
            for &player in [Player::X, Player::O].iter() {
                let mut board = Board::new();
                for &position in line.iter() {
                    board.play(position, player)?;
                }
                assert!(board.has_won(player), "{} should win on {}", player, board);
                assert!(!board.has_won(player.opponent()));
                assert_eq!(board.outcome(), GameOutcome::Win(player));
            }
        }
        Ok(())
    }

    #[test]
    pub fn two_in_a_row_does_not_win() -> Result<()> {
        let board: Board = "XX_/OO_/___".parse()?;
        assert!(!board.has_won(Player::X));
        assert!(!board.has_won(Player::O));
        assert_eq!(board.outcome(), GameOutcome::InProgress);
        Ok(())
    }

    #[test]
    pub fn has_won_is_symmetric_under_relabeling() -> Result<()> {
        for board in all_boards()? {
            let swapped = relabel(&board)?;
            assert_eq!(board.has_won(Player::X), swapped.has_won(Player::O));
            assert_eq!(board.has_won(Player::O), swapped.has_won(Player::X));
        }
        Ok(())
    }

    #[test]
    pub fn is_full_iff_no_empty_cell() -> Result<()> {
        for board in all_boards()? {
            let occupied = (0..SIZE)
                .flat_map(|row| (0..SIZE).map(move |col| Move::new(row, col)))
                .filter(|&position| !board.get(position).is_empty())
                .count();
            assert_eq!(board.is_full(), occupied == CELLS);
            assert_eq!(board.is_full(), board.empty_cells().next().is_none());
        }
        Ok(())
    }

    #[test]
    pub fn reachable_boards_have_at_most_one_winner() -> Result<()> {
        let boards = reachable_boards()?;
        assert_eq!(boards.len(), 5478);
        for board in boards {
            assert!(!(board.has_won(Player::X) && board.has_won(Player::O)));
        }
        Ok(())
    }

    #[test]
    pub fn keys_are_unique() -> Result<()> {
        let boards = all_boards()?;
        let keys: HashSet<u32> = boards.iter().map(|board| board.key()).collect();
        assert_eq!(keys.len(), boards.len());
        Ok(())
    }

    #[test]
    pub fn fixture_lines_checked_independently() -> Result<()> {
        let board: Board = "XOX/OXO/__O".parse()?;

        let mut winners = vec![];
        for line in LINES.iter() {
            let cells: Vec<_> = line.iter().map(|&position| board.get(position)).collect();
            if !cells[0].is_empty() && cells.iter().all(|&cell| cell == cells[0]) {
                winners.push(cells[0]);
            }
        }
        assert!(winners.is_empty());

        assert!(!board.has_won(Player::X));
        assert!(!board.has_won(Player::O));
        assert_eq!(board.outcome(), GameOutcome::InProgress);
        assert_eq!(
            board.empty_cells().collect::<Vec<_>>(),
            vec![Move::new(2, 0), Move::new(2, 1)]
        );
        Ok(())
    }

    #[test]
    pub fn full_board_without_a_line_is_a_draw() -> Result<()> {
        let board: Board = "XOX/XOO/OXX".parse()?;
        assert!(board.is_full());
        assert_eq!(board.outcome(), GameOutcome::Draw);
        Ok(())
    }

    #[test]
    pub fn full_board_with_a_line_is_a_win() -> Result<()> {
        let board: Board = "XOX/OXO/OXX".parse()?;
        assert!(board.is_full());
        assert_eq!(board.outcome(), GameOutcome::Win(Player::X));
        Ok(())
    }

    #[test]
    pub fn score_terminal_cases() -> Result<()> {
        let x_won: Board = "XXX/OO_/___".parse()?;
        assert_eq!(Solver::new(x_won, Player::X).score(4, false), MAX_SCORE - 4);
        assert_eq!(Solver::new(x_won, Player::O).score(4, true), 4 - MAX_SCORE);

        let drawn: Board = "XOX/XOO/OXX".parse()?;
        assert_eq!(Solver::new(drawn, Player::X).score(8, true), 0);
        assert_eq!(Solver::new(drawn, Player::O).score(8, false), 0);

        // unreachable, but the maximizer's win is checked first
        let both: Board = "XXX/OOO/___".parse()?;
        assert_eq!(Solver::new(both, Player::O).score(2, true), MAX_SCORE - 2);
        assert_eq!(Solver::new(both, Player::X).score(2, false), MAX_SCORE - 2);
        Ok(())
    }

    #[test]
    pub fn score_bounds_and_backtracking() -> Result<()> {
        for board in reachable_boards()? {
            let player = side_to_move(&board);
            let mut solver = Solver::new(board, player);
            let score = solver.score(0, true);

            assert!(score >= MIN_SCORE && score <= MAX_SCORE);
            assert_eq!(*solver.board(), board);
            assert!(solver.node_count >= 1);
        }
        Ok(())
    }

    #[test]
    pub fn best_move_leaves_board_untouched() -> Result<()> {
        let board: Board = "X__/_O_/___".parse()?;
        let mut solver = Solver::new(board, Player::X);
        let (_, best_move) = solver.best_move()?;

        assert_eq!(*solver.board(), board);
        assert!(board.get(best_move).is_empty());
        Ok(())
    }

    #[test]
    pub fn best_move_takes_immediate_win() -> Result<()> {
        // blocking at (0, 1) comes first in row-major order, but winning scores higher
        let board: Board = "X_X/OO_/X__".parse()?;
        let mut solver = Solver::new(board, Player::O);
        let (score, best_move) = solver.best_move()?;

        assert_eq!(best_move, Move::new(1, 2));
        assert_eq!(score, MAX_SCORE);
        assert_eq!(solver.plies_to_end(score), 1);
        Ok(())
    }

    #[test]
    pub fn best_move_blocks_immediate_loss() -> Result<()> {
        let board: Board = "XX_/O__/___".parse()?;
        let mut solver = Solver::new(board, Player::O);
        let (score, best_move) = solver.best_move()?;

        assert_eq!(best_move, Move::new(0, 2));
        assert!(score > MIN_SCORE + 1);
        Ok(())
    }

    #[test]
    pub fn opening_move_is_corner_or_centre() -> Result<()> {
        let mut solver = Solver::new(Board::new(), Player::X);
        let (score, best_move) = solver.best_move()?;

        let corners_and_centre = [
            Move::new(0, 0),
            Move::new(0, 2),
            Move::new(1, 1),
            Move::new(2, 0),
            Move::new(2, 2),
        ];
        assert!(corners_and_centre.contains(&best_move));
        assert_eq!(score, 0);
        assert_eq!(solver.plies_to_end(score), CELLS);
        Ok(())
    }

    #[test]
    pub fn optimal_self_play_draws() -> Result<()> {
        let mut board = Board::new();
        let mut player = Player::X;
        while !board.outcome().is_terminal() {
            let (_, best_move) = Solver::new(board, player).best_move()?;
            board.play(best_move, player)?;
            player = player.opponent();
        }
        assert_eq!(board.outcome(), GameOutcome::Draw);
        Ok(())
    }

    #[test]
    pub fn move_on_finished_game_is_an_error() -> Result<()> {
        let won: Board = "XXX/OO_/___".parse()?;
        assert!(Solver::new(won, Player::O).best_move().is_err());
        assert!(first_available_move(&won).is_err());

        let drawn: Board = "XOX/XOO/OXX".parse()?;
        assert!(Solver::new(drawn, Player::X).best_move().is_err());
        assert!(first_available_move(&drawn).is_err());
        Ok(())
    }

    #[test]
    pub fn first_available_scans_row_major() -> Result<()> {
        let board: Board = "X__/_O_/___".parse()?;
        assert_eq!(first_available_move(&board)?, Move::new(0, 1));

        let board: Board = "XOX/O__/___".parse()?;
        assert_eq!(first_available_move(&board)?, Move::new(1, 1));
        Ok(())
    }

    #[test]
    pub fn strategy_parsing_and_choice() -> Result<()> {
        assert_eq!("1".parse::<Strategy>()?, Strategy::Optimal);
        assert_eq!("Minimax".parse::<Strategy>()?, Strategy::Optimal);
        assert_eq!("2".parse::<Strategy>()?, Strategy::FirstAvailable);
        assert_eq!("easy".parse::<Strategy>()?, Strategy::FirstAvailable);
        assert!("hard".parse::<Strategy>().is_err());

        let board: Board = "XX_/OO_/___".parse()?;
        let (position, score) = Strategy::FirstAvailable.choose_move(&board, Player::O)?;
        assert_eq!((position, score), (Move::new(0, 2), None));

        let (position, score) = Strategy::Optimal.choose_move(&board, Player::X)?;
        assert_eq!((position, score), (Move::new(0, 2), Some(MAX_SCORE)));
        Ok(())
    }

    #[test]
    pub fn session_assigns_x_to_first_mover_and_alternates() -> Result<()> {
        assert_eq!("computer".parse::<Turn>()?, Turn::Computer);
        assert!("nobody".parse::<Turn>().is_err());

        let mut session = Session::new(Strategy::Optimal, Turn::Human);

        let game = session.new_game();
        assert_eq!(game.to_move(), Turn::Human);
        assert_eq!((game.human(), game.computer()), (Player::X, Player::O));
        assert_eq!(*game.board(), Board::new());

        let game = session.new_game();
        assert_eq!(game.to_move(), Turn::Computer);
        assert_eq!((game.human(), game.computer()), (Player::O, Player::X));

        let game = session.new_game();
        assert_eq!(game.to_move(), Turn::Human);
        Ok(())
    }

    #[test]
    pub fn game_enforces_turns() -> Result<()> {
        let mut session = Session::new(Strategy::Optimal, Turn::Human);
        let mut game = session.new_game();

        assert!(game.play_computer().is_err());
        game.play_human(Move::new(1, 1))?;
        assert!(game.play_human(Move::new(0, 0)).is_err());

        let (position, score) = game.play_computer()?;
        assert!(score.is_some());
        assert_eq!(game.board().get(position), crate::board::Cell::Mark(Player::O));

        // taken cell is rejected and the turn stays with the human
        assert!(game.play_human(position).is_err());
        assert_eq!(game.to_move(), Turn::Human);
        Ok(())
    }

    #[test]
    pub fn game_records_results() -> Result<()> {
        let mut session = Session::new(Strategy::FirstAvailable, Turn::Human);
        let mut game = session.new_game();

        // the easy computer fills the top row while the human takes the bottom one
        assert!(session.record(&game).is_err());
        game.play_human(Move::new(2, 0))?;
        assert_eq!(game.play_computer()?.0, Move::new(0, 0));
        game.play_human(Move::new(2, 1))?;
        assert_eq!(game.play_computer()?.0, Move::new(0, 1));
        assert_eq!(game.play_human(Move::new(2, 2))?, GameOutcome::Win(Player::X));

        assert!(game.play_computer().is_err());
        session.record(&game)?;

        // computer first and the human never blocks
        let mut game = session.new_game();
        game.play_computer()?;
        game.play_human(Move::new(2, 2))?;
        game.play_computer()?;
        game.play_human(Move::new(2, 1))?;
        game.play_computer()?;
        assert_eq!(game.outcome(), GameOutcome::Win(Player::X));
        session.record(&game)?;

        let scoreboard = session.scoreboard();
        assert_eq!(scoreboard.human_wins, 1);
        assert_eq!(scoreboard.computer_wins, 1);
        assert_eq!(scoreboard.draws, 0);
        assert_eq!(scoreboard.games(), 2);
        Ok(())
    }

    #[test]
    pub fn optimal_never_loses() -> Result<()> {
        for &computer_first in [true, false].iter() {
            let report = analyse(Strategy::Optimal, computer_first, false)?;
            assert!(report.games > 0);
            assert_eq!(report.computer_losses, 0, "{}", report);
            assert_eq!(
                report.games,
                report.computer_wins + report.draws + report.computer_losses
            );
            assert!(report.unique_positions() > 1);
        }
        Ok(())
    }

    #[test]
    pub fn first_available_can_lose() -> Result<()> {
        for &computer_first in [true, false].iter() {
            let report = analyse(Strategy::FirstAvailable, computer_first, false)?;
            assert!(report.computer_losses > 0, "{}", report);
        }
        Ok(())
    }

    #[test]
    pub fn plies_to_end_counts_forced_wins_and_losses() -> Result<()> {
        // playing (1, 0) forces a win four plies later
        let board: Board = "XO_/___/___".parse()?;
        let mut solver = Solver::new(board, Player::X);
        let (score, best_move) = solver.best_move()?;
        assert_eq!((score, best_move), (MAX_SCORE - 4, Move::new(1, 0)));
        assert_eq!(solver.plies_to_end(score), 5);

        // O cannot stop all three of X's lines, X wins on the very next move
        let board: Board = "XX_/OX_/O__".parse()?;
        let mut solver = Solver::new(board, Player::O);
        let (score, best_move) = solver.best_move()?;
        assert_eq!((score, best_move), (1 - MAX_SCORE, Move::new(0, 2)));
        assert_eq!(solver.plies_to_end(score), 2);

        // X forks after O's best reply, O loses three plies later
        let board: Board = "X_O/___/X__".parse()?;
        let mut solver = Solver::new(board, Player::O);
        let (score, best_move) = solver.best_move()?;
        assert_eq!((score, best_move), (3 - MAX_SCORE, Move::new(1, 0)));
        assert_eq!(solver.plies_to_end(score), 4);
        Ok(())
    }

    #[test]
    pub fn prompts_accept_answers_after_retries() -> Result<()> {
        let mut output = vec![];
        let strategy = ask_strategy(&mut Cursor::new("hard\n2\n"), &mut output)?;
        assert_eq!(strategy, Strategy::FirstAvailable);
        assert_eq!(
            String::from_utf8(output)?.matches("Unknown answer given").count(),
            1
        );

        let mut output = vec![];
        assert_eq!(ask_first(&mut Cursor::new("Yes\n"), &mut output)?, Turn::Human);
        assert_eq!(ask_first(&mut Cursor::new("\nn\n"), &mut output)?, Turn::Computer);
        Ok(())
    }

    #[test]
    pub fn prompts_fail_when_input_is_closed() -> Result<()> {
        let mut output = vec![];
        assert!(ask_strategy(&mut Cursor::new(""), &mut output).is_err());
        assert!(ask_first(&mut Cursor::new(""), &mut output).is_err());
        // unanswered after a bad answer, the question is not repeated forever
        assert!(ask_first(&mut Cursor::new("maybe\n"), &mut output).is_err());
        Ok(())
    }
}
