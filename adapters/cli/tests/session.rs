use farmstead_cli::session::{run, SessionOptions};
use farmstead_cli::tuning::Tuning;
use farmstead_presentation::Notification;

fn quick_options() -> SessionOptions {
    SessionOptions {
        tuning: Tuning::default(),
        seed: 7,
        ticks: 30,
        builds: 2,
    }
}

#[test]
fn scripted_session_boots_builds_and_roams() {
    let report = run(&quick_options());

    assert_eq!(report.houses, 2, "both scripted builds must commit");
    assert_eq!(report.visible_wanderers, 3);
    assert_eq!(report.hidden_wanderers, 0);

    let ready = report
        .notifications
        .iter()
        .filter(|notification| matches!(notification, Notification::SceneReady))
        .count();
    assert_eq!(ready, 1, "the scene becomes ready exactly once");

    let built = report
        .notifications
        .iter()
        .filter(|notification| matches!(notification, Notification::HouseBuilt { .. }))
        .count();
    assert_eq!(built, 2);
}

#[test]
fn sessions_replay_identically_for_the_same_options() {
    let first = run(&quick_options());
    let second = run(&quick_options());

    assert_eq!(first.notifications, second.notifications);
    assert_eq!(first.houses, second.houses);
}

#[test]
fn a_cramped_board_hides_the_overflow_wanderers() {
    let mut options = quick_options();
    options.tuning.board.columns = 1;
    options.tuning.board.rows = 2;
    options.tuning.wanderers.count = 3;
    options.builds = 0;
    options.ticks = 0;

    let report = run(&options);

    assert_eq!(report.visible_wanderers, 2, "one wanderer per free cell");
    assert_eq!(report.hidden_wanderers, 1);
}
