use whiteboard_system::*;

fn dot(x: f64, color: &str) -> Stroke {
    Stroke::new(vec![Point::new(x, x)], color, 4.0)
}

#[test]
fn it_shares_one_undo_between_users() {
    let mut state = SessionState::new();
    let alice = new_connection_id();
    let bob = new_connection_id();
    let alice_color = state.add_user(alice);
    let bob_color = state.add_user(bob);

    state.add_stroke(dot(1.0, &alice_color));
    state.add_stroke(dot(2.0, &bob_color));

    // Alice's undo takes back Bob's stroke: the most recent one wins.
    let history = state.undo().expect("");
    assert_eq!(history, vec![dot(1.0, &alice_color)]);
    assert_eq!(state.undo_buffer(), &[dot(2.0, &bob_color)]);

    state.add_stroke(dot(3.0, &alice_color));
    assert_eq!(
        state.history(),
        vec![dot(1.0, &alice_color), dot(3.0, &alice_color)]
    );
    assert!(state.undo_buffer().is_empty());
}

#[test]
fn it_keeps_history_when_users_come_and_go() {
    let mut state = SessionState::new();
    state.add_stroke(dot(1.0, "red"));
    let before = state.history();

    let alice = new_connection_id();
    state.add_user(alice);
    assert_eq!(state.history(), before);

    state.remove_user(&alice);
    assert!(state.update_cursor(&alice, 1.0, 2.0).is_none());
    assert_eq!(state.history(), before);
    assert_eq!(state.user_count(), 0);
}

#[test]
fn it_replays_full_history_after_overflow() {
    let mut state = SessionState::new();
    for n in 0..=HISTORY_LIMIT {
        state.add_stroke(dot(n as f64, "blue"));
    }
    let history = state.history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history.first(), Some(&dot(1.0, "blue")));
    assert_eq!(history.last(), Some(&dot(HISTORY_LIMIT as f64, "blue")));
}
