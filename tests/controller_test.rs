//! Game controller: round lifecycle and the mismatch cooldown timer.

use std::time::Duration;

use trivia_match::{
    Card, CardSource, FetchError, FileCardSource, GameConfig, GameController, GameError, Phase,
    SelectOutcome, Side, StaticCardSource, TeamSetup, TeamSlot, TileKey,
};

fn deck(n: usize) -> Vec<Card> {
    (0..n)
        .map(|i| Card::new(format!("c{i}"), format!("Question {i}?"), format!("Answer {i}")))
        .collect()
}

/// Serves `deck(count)` after `delay`.
struct SlowSource {
    delay: Duration,
    count: usize,
}

#[async_trait::async_trait]
impl CardSource for SlowSource {
    async fn fetch_cards(&self) -> Result<Vec<Card>, FetchError> {
        tokio::time::sleep(self.delay).await;
        Ok(deck(self.count))
    }

    fn describe(&self) -> String {
        "slow test source".to_string()
    }
}

fn deck_json(n: usize) -> String {
    serde_json::to_string(&trivia_match::CardsPayload::new(deck(n))).unwrap()
}

async fn started(cards: usize, round_size: usize) -> GameController {
    let mut controller = GameController::new(
        Box::new(StaticCardSource::new(deck(cards))),
        GameConfig::new(round_size, 5000),
    );
    controller.load_cards().await;
    controller.start_game(TeamSetup::default()).unwrap();
    controller
}

/// First question tile and an answer tile for a different card.
fn wrong_pair(controller: &GameController) -> (TileKey, TileKey) {
    let round = controller.session().unwrap().round();
    let question = &round.tiles(Side::Question)[0];
    let answer = round
        .tiles(Side::Answer)
        .iter()
        .find(|t| t.card_id() != question.card_id())
        .unwrap();
    (*question.key(), *answer.key())
}

fn mismatch(controller: &mut GameController) -> TileKey {
    let (question, answer) = wrong_pair(controller);
    controller.select(question);
    let outcome = controller.select(answer);
    assert!(matches!(outcome, Some(SelectOutcome::Mismatched { .. })));
    question
}

fn phase(controller: &GameController) -> Phase {
    controller.session().unwrap().phase()
}

#[tokio::test(start_paused = true)]
async fn mismatch_flips_back_and_passes_the_turn() {
    let mut controller = started(6, 4).await;
    mismatch(&mut controller);
    assert_eq!(controller.cooldown_remaining(), Some(Duration::from_millis(5000)));
    assert_eq!(phase(&controller), Phase::MismatchCooldown);

    let start = tokio::time::Instant::now();
    assert_eq!(controller.next_elapsed().await, Some(true));
    assert!(start.elapsed() >= Duration::from_millis(5000));

    let session = controller.session().unwrap();
    assert_eq!(session.active(), TeamSlot::Second);
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(controller.cooldown_remaining(), None);
}

#[tokio::test(start_paused = true)]
async fn nothing_happens_before_the_cooldown_ends() {
    let mut controller = started(6, 4).await;
    mismatch(&mut controller);

    tokio::time::sleep(Duration::from_millis(4000)).await;
    assert_eq!(controller.drain_elapsed(), 0);
    assert_eq!(phase(&controller), Phase::MismatchCooldown);
    assert_eq!(controller.cooldown_remaining(), Some(Duration::from_millis(1000)));
}

#[tokio::test(start_paused = true)]
async fn detail_view_pauses_and_resumes_the_cooldown() {
    let mut controller = started(6, 4).await;
    let question = mismatch(&mut controller);

    tokio::time::sleep(Duration::from_millis(2000)).await;
    let outcome = controller.select(question);
    assert!(matches!(
        outcome,
        Some(SelectOutcome::ZoomOpened {
            paused: Some(_),
            ..
        })
    ));
    assert!(controller.cooldown_paused());
    assert_eq!(controller.cooldown_remaining(), Some(Duration::from_millis(3000)));

    // Paused time does not count.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(controller.drain_elapsed(), 0);
    assert_eq!(phase(&controller), Phase::MismatchCooldown);

    controller.close_zoom();
    assert!(!controller.cooldown_paused());
    assert!(controller.session().unwrap().zoom().is_none());

    let resumed = tokio::time::Instant::now();
    assert_eq!(controller.next_elapsed().await, Some(true));
    assert!(resumed.elapsed() >= Duration::from_millis(3000));
    assert_eq!(controller.session().unwrap().active(), TeamSlot::Second);
}

#[tokio::test(start_paused = true)]
async fn selecting_while_zoomed_resumes_the_cooldown() {
    let mut controller = started(6, 4).await;
    let question = mismatch(&mut controller);
    controller.select(question);
    assert!(controller.cooldown_paused());

    let outcome = controller.select(question);
    assert!(matches!(
        outcome,
        Some(SelectOutcome::ZoomClosed { resumed: Some(_) })
    ));
    assert!(!controller.cooldown_paused());
    assert_eq!(controller.next_elapsed().await, Some(true));
}

#[tokio::test(start_paused = true)]
async fn new_round_cancels_a_pending_cooldown() {
    let mut controller = started(6, 4).await;
    mismatch(&mut controller);

    controller.new_round().unwrap();
    assert_eq!(controller.cooldown_remaining(), None);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(controller.drain_elapsed(), 0);
    let session = controller.session().unwrap();
    assert_eq!(session.active(), TeamSlot::First);
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.scores(), [0, 0]);
}

#[tokio::test(start_paused = true)]
async fn change_teams_drops_the_session_and_the_cooldown() {
    let mut controller = started(6, 4).await;
    mismatch(&mut controller);

    controller.change_teams();
    assert!(controller.session().is_none());
    assert_eq!(controller.cooldown_remaining(), None);
    assert_eq!(controller.select(TileKey::question(0)), None);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(controller.drain_elapsed(), 0);
}

#[tokio::test]
async fn start_game_uses_the_setup() {
    let mut controller = GameController::new(
        Box::new(StaticCardSource::new(deck(5))),
        GameConfig::new(3, 5000),
    );
    controller.load_cards().await;
    controller
        .start_game(TeamSetup::new(["Owls", ""], ["#00ff00", "bad"], TeamSlot::Second))
        .unwrap();

    let session = controller.session().unwrap();
    assert_eq!(session.round().size(), 3);
    assert_eq!(session.active(), TeamSlot::Second);
    assert_eq!(session.team(TeamSlot::First).name(), "Owls");
    assert_eq!(session.team(TeamSlot::Second).name(), "Team 2");
    assert_eq!(controller.setup().names[0], "Owls");
}

#[tokio::test]
async fn failed_fetch_blocks_the_game() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = GameController::new(
        Box::new(FileCardSource::new(dir.path().join("missing.json"))),
        GameConfig::default(),
    );
    controller.load_cards().await;

    let err = controller.start_game(TeamSetup::default()).unwrap_err();
    assert!(matches!(err, GameError::Fetch(_)));
    assert!(controller.session().is_none());
}

#[tokio::test]
async fn too_few_cards_blocks_the_game() {
    let mut controller = GameController::new(
        Box::new(StaticCardSource::new(deck(2))),
        GameConfig::new(3, 5000),
    );
    controller.load_cards().await;

    match controller.start_game(TeamSetup::default()) {
        Err(GameError::InsufficientCards(err)) => {
            assert_eq!(err.available, 2);
            assert_eq!(err.required, 3);
        }
        other => panic!("expected insufficient cards, got {other:?}"),
    }
    assert!(controller.session().is_none());
}

#[tokio::test]
async fn failed_new_round_keeps_the_current_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.json");
    std::fs::write(&path, deck_json(4)).unwrap();

    let mut controller = GameController::new(
        Box::new(FileCardSource::new(path.clone())),
        GameConfig::new(3, 5000),
    );
    controller.load_cards().await;
    controller.start_game(TeamSetup::default()).unwrap();
    let question = controller.session().unwrap().round().tiles(Side::Question)[0].clone();
    controller.select(*question.key());
    let before = controller.session().cloned();

    std::fs::write(&path, deck_json(1)).unwrap();
    controller.load_cards().await;
    assert_eq!(controller.store().cards().len(), 1);

    let err = controller.new_round().unwrap_err();
    assert!(matches!(err, GameError::InsufficientCards(_)));
    assert_eq!(controller.session().cloned(), before);
}

#[tokio::test]
async fn new_round_without_a_session_starts_one() {
    let mut controller = GameController::new(
        Box::new(StaticCardSource::new(deck(4))),
        GameConfig::new(4, 5000),
    );
    controller.load_cards().await;
    controller.new_round().unwrap();
    assert_eq!(controller.session().unwrap().round().size(), 4);
}

#[tokio::test(start_paused = true)]
async fn cards_load_in_the_background() {
    let mut controller = GameController::new(
        Box::new(SlowSource {
            delay: Duration::from_secs(2),
            count: 5,
        }),
        GameConfig::new(3, 5000),
    );

    assert!(controller.refresh_cards());
    assert!(controller.store().loading());
    assert!(!controller.store().loaded());
    assert!(!controller.refresh_cards(), "one fetch at a time");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!controller.poll_cards());
    assert!(controller.store().loading());
    assert!(matches!(
        controller.start_game(TeamSetup::default()),
        Err(GameError::InsufficientCards(_))
    ));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(controller.poll_cards());
    assert!(!controller.store().loading());
    assert!(controller.store().loaded());
    assert_eq!(controller.store().cards().len(), 5);
    assert!(!controller.poll_cards());

    controller.start_game(TeamSetup::default()).unwrap();
}

#[tokio::test(start_paused = true)]
async fn load_cards_waits_for_a_fetch_already_in_flight() {
    let mut controller = GameController::new(
        Box::new(SlowSource {
            delay: Duration::from_secs(2),
            count: 4,
        }),
        GameConfig::new(4, 5000),
    );
    controller.refresh_cards();
    controller.load_cards().await;

    assert!(!controller.store().loading());
    assert_eq!(controller.store().cards().len(), 4);
    assert!(!controller.poll_cards());
}
