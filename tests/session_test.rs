//! Session state machine: reveals, matches, mismatches and the detail view.

use rand::{SeedableRng, rngs::StdRng};
use trivia_match::{
    Card, IgnoreReason, Phase, SelectOutcome, Session, Side, TeamSetup, TeamSlot, TileKey,
    build_round,
};

fn deck(n: usize) -> Vec<Card> {
    (0..n)
        .map(|i| Card::new(format!("c{i}"), format!("Question {i}?"), format!("Answer {i}")))
        .collect()
}

fn session(size: usize) -> Session {
    let round = build_round(&deck(size), size, &mut StdRng::seed_from_u64(7)).unwrap();
    Session::new(TeamSetup::default().teams(), TeamSlot::First, round)
}

fn question(session: &Session, id: &str) -> TileKey {
    session.round().find(Side::Question, id).unwrap()
}

fn answer(session: &Session, id: &str) -> TileKey {
    session.round().find(Side::Answer, id).unwrap()
}

fn mismatch(session: &mut Session) -> trivia_match::CooldownTicket {
    let q = question(session, "c0");
    let a = answer(session, "c1");
    session.select(q);
    match session.select(a) {
        SelectOutcome::Mismatched { ticket } => ticket,
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn new_session_starts_idle_with_zero_scores() {
    let session = session(4);
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.scores(), [0, 0]);
    assert_eq!(session.active(), TeamSlot::First);
    assert!(session.ledger().is_empty());
    assert!(session.zoom().is_none());
}

#[test]
fn matching_pair_scores_and_keeps_the_turn() {
    let mut session = session(4);
    let q = question(&session, "c2");
    let a = answer(&session, "c2");

    assert_eq!(session.select(q), SelectOutcome::Revealed(q));
    assert_eq!(session.phase(), Phase::OneRevealed(Side::Question));
    assert_eq!(
        session.select(a),
        SelectOutcome::Matched {
            card_id: "c2".to_string(),
            team: TeamSlot::First,
            round_complete: false,
        }
    );

    assert_eq!(session.scores(), [1, 0]);
    assert_eq!(session.active(), TeamSlot::First);
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.winner_of(q), Some(TeamSlot::First));
    assert!(session.is_face_up(a));
    assert!(!session.is_revealed(a));
}

#[test]
fn answer_can_be_revealed_first() {
    let mut session = session(3);
    let a = answer(&session, "c1");
    assert_eq!(session.select(a), SelectOutcome::Revealed(a));
    assert_eq!(session.phase(), Phase::OneRevealed(Side::Answer));
    assert!(matches!(
        session.select(question(&session, "c1")),
        SelectOutcome::Matched { .. }
    ));
}

#[test]
fn mismatch_holds_the_pair_until_the_cooldown_ends() {
    let mut session = session(4);
    let ticket = mismatch(&mut session);

    assert_eq!(session.phase(), Phase::MismatchCooldown);
    assert!(session.is_revealed(question(&session, "c0")));
    assert!(session.is_revealed(answer(&session, "c1")));
    assert_eq!(session.cooldown().map(|c| c.ticket), Some(ticket));

    let other = question(&session, "c3");
    assert_eq!(
        session.select(other),
        SelectOutcome::Ignored(IgnoreReason::CoolingDown)
    );

    assert!(session.expire_cooldown(ticket));
    assert_eq!(session.active(), TeamSlot::Second);
    assert_eq!(session.phase(), Phase::Idle);
    assert!(!session.is_face_up(question(&session, "c0")));
    assert_eq!(session.pending(Side::Question), None);
    assert_eq!(session.pending(Side::Answer), None);
    assert!(session.ledger().is_empty());
    assert_eq!(session.scores(), [0, 0]);
}

#[test]
fn second_tile_on_the_same_side_is_ignored() {
    let mut session = session(4);
    let first = question(&session, "c0");
    session.select(first);

    assert_eq!(
        session.select(question(&session, "c1")),
        SelectOutcome::Ignored(IgnoreReason::SidePending)
    );
    assert_eq!(session.pending(Side::Question), Some(first));
    assert_eq!(
        session.select(first),
        SelectOutcome::Ignored(IgnoreReason::SidePending)
    );
}

#[test]
fn selecting_a_matched_tile_only_opens_the_detail_view() {
    let mut session = session(4);
    let q = question(&session, "c0");
    session.select(q);
    session.select(answer(&session, "c0"));

    assert_eq!(
        session.select(q),
        SelectOutcome::ZoomOpened {
            key: q,
            paused: None
        }
    );
    assert_eq!(session.zoom().map(|t| t.card_id()), Some("c0"));

    // Any selection closes the view without acting on the board.
    assert_eq!(
        session.select(question(&session, "c1")),
        SelectOutcome::ZoomClosed { resumed: None }
    );
    assert!(session.zoom().is_none());
    assert_eq!(session.scores(), [1, 0]);
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn opening_a_revealed_tile_pauses_the_cooldown() {
    let mut session = session(4);
    let ticket = mismatch(&mut session);
    let q = question(&session, "c0");

    assert_eq!(
        session.select(q),
        SelectOutcome::ZoomOpened {
            key: q,
            paused: Some(ticket)
        }
    );
    assert!(session.cooldown().is_some_and(|c| c.paused));

    assert_eq!(session.close_zoom(), Some(ticket));
    assert!(session.cooldown().is_some_and(|c| !c.paused));
    assert_eq!(session.close_zoom(), None);
}

#[test]
fn cooldown_expiry_closes_an_open_detail_view() {
    let mut session = session(4);
    let ticket = mismatch(&mut session);
    session.select(answer(&session, "c1"));
    assert!(session.zoom().is_some());

    assert!(session.expire_cooldown(ticket));
    assert!(session.zoom().is_none());
}

#[test]
fn stale_ticket_changes_nothing() {
    let mut session = session(4);
    let ticket = mismatch(&mut session);

    let round = build_round(&deck(4), 4, &mut StdRng::seed_from_u64(8)).unwrap();
    session.restart(round);
    let before = session.clone();

    assert!(!session.expire_cooldown(ticket));
    assert_eq!(session, before);
    assert_eq!(session.active(), TeamSlot::First);
}

#[test]
fn tickets_are_never_reused() {
    let mut first = session(2);
    let mut second = session(2);
    let a = mismatch(&mut first);
    let b = mismatch(&mut second);
    assert_ne!(a, b);
    assert!(!second.expire_cooldown(a));
    assert!(second.expire_cooldown(b));
}

#[test]
fn last_match_completes_the_round() {
    let mut session = session(2);
    session.select(question(&session, "c0"));
    session.select(answer(&session, "c0"));
    session.select(question(&session, "c1"));
    assert_eq!(
        session.select(answer(&session, "c1")),
        SelectOutcome::Matched {
            card_id: "c1".to_string(),
            team: TeamSlot::First,
            round_complete: true,
        }
    );
    assert!(session.is_complete());
    assert_eq!(session.phase(), Phase::Complete);
    assert_eq!(session.ledger().count_for(TeamSlot::First), 2);
    assert_eq!(session.scores(), [2, 0]);
    assert_eq!(
        session.select(TileKey::question(9)),
        SelectOutcome::Ignored(IgnoreReason::UnknownTile)
    );
}

#[test]
fn clicks_after_completion_change_nothing() {
    let mut session = session(2);
    for id in ["c0", "c1"] {
        session.select(question(&session, id));
        session.select(answer(&session, id));
    }
    assert!(session.is_complete());

    for key in [
        question(&session, "c0"),
        answer(&session, "c1"),
        question(&session, "c1"),
        answer(&session, "c0"),
    ] {
        // Matched tiles open the detail view; the next click closes it.
        session.select(key);
        session.close_zoom();
        assert_eq!(session.scores(), [2, 0]);
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.active(), TeamSlot::First);
        assert_eq!(session.phase(), Phase::Complete);
    }
    assert_eq!(session.ledger().winner("c0"), Some(TeamSlot::First));
    assert_eq!(session.ledger().winner("c1"), Some(TeamSlot::First));
}

#[test]
fn out_of_range_reveal_in_a_snapshot_is_dropped() {
    let session = session(3);
    let mut json = serde_json::to_value(&session).unwrap();
    json["revealed_answer"] = serde_json::json!(42);
    let mut restored: Session = serde_json::from_value(json).unwrap();

    // Revealing a question pairs it with the bogus answer index.
    assert_eq!(
        restored.select(question(&restored, "c0")),
        SelectOutcome::Ignored(IgnoreReason::UnknownTile)
    );
    assert_eq!(restored.phase(), Phase::Idle);
    assert_eq!(restored.scores(), [0, 0]);
    assert!(restored.ledger().is_empty());

    // The board is usable again afterwards.
    assert!(matches!(
        restored.select(question(&restored, "c1")),
        SelectOutcome::Revealed(_)
    ));
}

#[test]
fn turns_alternate_across_mismatches() {
    let mut session = session(4);
    let ticket = mismatch(&mut session);
    session.expire_cooldown(ticket);
    assert_eq!(session.active(), TeamSlot::Second);

    session.select(question(&session, "c3"));
    assert_eq!(
        session.select(answer(&session, "c3")),
        SelectOutcome::Matched {
            card_id: "c3".to_string(),
            team: TeamSlot::Second,
            round_complete: false,
        }
    );
    assert_eq!(session.scores(), [0, 1]);

    let ticket = mismatch(&mut session);
    session.expire_cooldown(ticket);
    assert_eq!(session.active(), TeamSlot::First);
}

#[test]
fn restart_clears_scores_and_board_state() {
    let mut session = Session::new(
        TeamSetup::new(["Owls", "Foxes"], ["#00ff00", "#ff8800"], TeamSlot::Second).teams(),
        TeamSlot::Second,
        build_round(&deck(3), 3, &mut StdRng::seed_from_u64(11)).unwrap(),
    );
    session.select(question(&session, "c0"));
    session.select(answer(&session, "c0"));
    session.select(question(&session, "c1"));
    assert_eq!(session.scores(), [0, 1]);

    session.restart(build_round(&deck(3), 3, &mut StdRng::seed_from_u64(12)).unwrap());

    assert_eq!(session.scores(), [0, 0]);
    assert!(session.ledger().is_empty());
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.active(), TeamSlot::Second);
    assert_eq!(session.team(TeamSlot::First).name(), "Owls");
}

#[test]
fn session_serializes_to_json() {
    let mut session = session(3);
    session.select(question(&session, "c0"));
    session.select(answer(&session, "c0"));

    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(json["active"], "First");
    assert_eq!(json["ledger"]["entries"]["c0"], "First");

    let decoded: Session = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, session);
}
