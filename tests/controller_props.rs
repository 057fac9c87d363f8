//! Property tests over random sequences of player actions

mod common;

use proptest::prelude::*;

use song_guesser::game::{GamePhase, NO_SEGMENT};

use common::{controller, pool, track};

#[derive(Clone, Debug)]
enum Action {
    Unlock,
    Play,
    Stop,
    Guess(bool),
    Reset,
    Tick(u64),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => Just(Action::Unlock),
        1 => Just(Action::Play),
        1 => Just(Action::Stop),
        2 => any::<bool>().prop_map(Action::Guess),
        1 => Just(Action::Reset),
        2 => (0u64..3_000).prop_map(Action::Tick),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn progress_counters_stay_consistent(actions in prop::collection::vec(action(), 0..40)) {
        runtime().block_on(async {
            let (mut game, _playback, _notices) = controller();
            game.load_track(Some(track("t1", "Chime")), Some(pool())).await;
            let segments = game.schedule().len() as i32;

            for action in actions {
                let before = game.state().clone();
                match &action {
                    Action::Unlock => {
                        game.unlock_next_segment().await.unwrap();
                    }
                    Action::Play => {
                        game.play(None).await.unwrap();
                    }
                    Action::Stop => game.stop().await,
                    Action::Guess(correct) => {
                        let title = game.state().current_track().unwrap().title.clone();
                        game.set_guess_text(if *correct { title } else { "not it".to_string() });
                        game.submit_guess();
                    }
                    Action::Reset => {
                        game.reset_game(None).await.unwrap();
                    }
                    Action::Tick(ms) => {
                        tokio::time::sleep(std::time::Duration::from_millis(*ms)).await;
                        game.process_pending().await;
                    }
                }

                let state = game.state();
                prop_assert!(state.unlocked_segment_index() >= NO_SEGMENT);
                prop_assert!(state.unlocked_segment_index() < segments);
                prop_assert_eq!(state.attempts() as i32, state.unlocked_segment_index() + 1);

                if before.is_won() && !matches!(action, Action::Reset) {
                    prop_assert!(state.is_won());
                    prop_assert_eq!(state.attempts(), before.attempts());
                }
                if matches!(action, Action::Reset) {
                    prop_assert_eq!(game.phase(), GamePhase::Ready);
                    prop_assert!(!state.is_playing());
                }
                if matches!(action, Action::Stop) {
                    prop_assert!(!state.is_playing());
                }
            }
            Ok(())
        })?;
    }
}
