//! End-to-end scenarios: commands go in through the queue, log lines come
//! out of the sink.
//!
//! Each test builds its own core with a fast display tick and asserts on
//! the recorded line catalogue. Waits are generous and poll-based; nothing
//! here depends on a tick landing in an exact slot.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chime::{parse_command, Config, Core, MemorySink};

const WAIT: Duration = Duration::from_secs(10);
const LONG_WAIT: Duration = Duration::from_secs(20);

fn test_core() -> (Arc<Core>, Arc<MemorySink>) {
    let cfg = Config {
        tick: Duration::from_millis(100),
        ..Config::default()
    };
    let sink = Arc::new(MemorySink::new());
    let core = Core::new(cfg, sink.clone());
    core.spawn_workers().expect("spawn workers");
    (core, sink)
}

fn submit(core: &Core, line: &str) {
    let record = parse_command(line, 127).expect("test command must parse");
    core.submit(record);
}

fn wait_until(cond: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn basic_lifecycle_prints_periodically() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(1): Group(10) 2 60 hello");

    assert!(sink.wait_for("Alarm Thread has Inserted Start_Alarm Request(1)", WAIT));
    assert!(sink.wait_for("Consumer Thread has Retrieved Start_Alarm Request(1)", WAIT));
    assert!(sink.wait_for("Start_Alarm(1) Inserted by Consumer Thread", WAIT));
    assert!(sink.wait_for("New Display Alarm Thread", WAIT));
    assert!(sink.wait_for("Alarm (1) Printed by Alarm Display Thread", WAIT));

    let printed = sink
        .matching("Alarm (1) Printed")
        .first()
        .cloned()
        .expect("print line recorded");
    assert!(printed.contains("Group(10)"));
    assert!(printed.ends_with("hello"));
}

#[test]
fn change_rewrites_the_message_in_place() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(2): Group(11) 1 60 hello");
    assert!(sink.wait_for("Alarm (2) Printed", WAIT));

    submit(&core, "Change_Alarm(2): Group(11) 60 world");
    assert!(sink.wait_for("Alarm(2) Changed at", WAIT));
    assert!(sink.wait_for("Starts to Print Changed Message Alarm(2)", WAIT));
    assert!(wait_until(
        || sink
            .matching("Alarm (2) Printed")
            .iter()
            .any(|l| l.ends_with("world")),
        WAIT
    ));

    // Same group: the hand-off path must stay quiet.
    assert!(!sink.contains("Has Taken Over Printing Message of Alarm(2)"));
}

#[test]
fn group_move_hands_the_alarm_over() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(3): Group(10) 1 60 hello");
    assert!(sink.wait_for("Alarm (3) Printed", WAIT));

    submit(&core, "Change_Alarm(3): Group(20) 60 hello");
    assert!(sink.wait_for("Has Stopped Printing Message of Alarm(3)", WAIT));
    assert!(sink.wait_for("Has Taken Over Printing Message of Alarm(3)", WAIT));
    assert!(sink.wait_for("New Display Alarm Thread", WAIT));
    assert!(sink
        .matching("Created for Group(20)")
        .first()
        .is_some());

    // The old group's scheduler empties out and leaves.
    assert!(sink.wait_for("No More Alarms in Group(10)", WAIT));

    // Printing continues under the new group.
    assert!(wait_until(
        || sink
            .matching("Alarm (3) Printed")
            .iter()
            .any(|l| l.contains("Group(20)")),
        WAIT
    ));
}

#[test]
fn expiry_stops_printing_exactly_once() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(4): Group(12) 1 2 brief");

    assert!(sink.wait_for("Alarm (4) Printed", WAIT));
    assert!(sink.wait_for("Has Stopped Printing Expired Alarm(4)", WAIT));
    assert!(sink.wait_for("No More Alarms in Group(12)", WAIT));
    assert_eq!(sink.matching("Has Stopped Printing Expired Alarm(4)").len(), 1);
}

#[test]
fn suspend_pauses_and_reactivate_resumes() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(5): Group(13) 1 120 tick");
    assert!(sink.wait_for("Alarm (5) Printed", WAIT));

    submit(&core, "Suspend_Alarm(5)");
    assert!(sink.wait_for("Alarm(5) Suspended at", WAIT));

    // No prints land after the suspension is announced.
    let baseline = sink.matching("Alarm (5) Printed").len();
    std::thread::sleep(Duration::from_secs(3));
    assert_eq!(sink.matching("Alarm (5) Printed").len(), baseline);

    submit(&core, "Reactivate_Alarm(5)");
    assert!(sink.wait_for("Alarm(5) Reactivated at", WAIT));
    assert!(wait_until(
        || sink.matching("Alarm (5) Printed").len() > baseline,
        WAIT
    ));
}

#[test]
fn cancel_removes_the_alarm_and_its_scheduler() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(6): Group(14) 1 120 doomed");
    assert!(sink.wait_for("Alarm (6) Printed", WAIT));

    submit(&core, "Cancel_Alarm(6)");
    assert!(sink.wait_for("Has Stopped Printing Message of Alarm(6)", WAIT));
    assert!(sink.wait_for("No More Alarms in Group(14)", WAIT));
}

#[test]
fn invalid_change_is_reported_once_and_changes_nothing() {
    let (core, sink) = test_core();
    submit(&core, "Change_Alarm(999): Group(1) 10 x");

    assert!(sink.wait_for("Invalid Change Alarm Request(999)", WAIT));
    assert_eq!(sink.matching("Invalid Change Alarm Request(999)").len(), 1);
    assert!(!sink.contains("Alarm(999) Changed"));
}

#[test]
fn invalid_suspend_and_cancel_are_reported() {
    let (core, sink) = test_core();
    submit(&core, "Suspend_Alarm(888)");
    assert!(sink.wait_for("Invalid Suspend Alarm Request(888)", WAIT));

    submit(&core, "Cancel_Alarm(777)");
    assert!(sink.wait_for("Invalid Cancel Alarm Request(777)", WAIT));
}

#[test]
fn view_lists_alarms_admitted_strictly_earlier() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(61): Group(15) 2 120 one");
    submit(&core, "Start_Alarm(62): Group(15) 2 120 two");
    assert!(sink.wait_for("Alarm (61) Printed", WAIT));

    // Land the view request in a strictly later wall-second.
    std::thread::sleep(Duration::from_millis(1500));
    submit(&core, "View_Alarms");

    assert!(sink.wait_for("View Alarms at View Time", WAIT));
    assert!(wait_until(|| sink.contains("Alarm(61):"), WAIT));
    assert!(wait_until(|| sink.contains("Alarm(62):"), WAIT));
}

#[test]
fn third_alarm_in_a_group_needs_a_second_scheduler() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(71): Group(40) 2 120 a");
    submit(&core, "Start_Alarm(72): Group(40) 2 120 b");
    submit(&core, "Start_Alarm(73): Group(40) 2 120 c");

    assert!(wait_until(
        || sink.matching("Created for Group(40)").len() == 2,
        WAIT
    ));
    assert_eq!(sink.matching("Assigned to Display Alarm Thread").len(), 1);
}

#[test]
fn duplicate_start_id_is_rejected() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(81): Group(41) 2 120 first");
    assert!(sink.wait_for("Alarm (81) Printed", WAIT));

    submit(&core, "Start_Alarm(81): Group(42) 2 120 second");
    assert!(sink.wait_for("Invalid Start Alarm Request(81)", WAIT));
    assert!(!sink.contains("Created for Group(42)"));
}

#[test]
fn round_robin_visits_groups_in_ascending_order() {
    let (core, sink) = test_core();
    submit(&core, "Start_Alarm(31): Group(5) 1 120 five");
    submit(&core, "Start_Alarm(32): Group(3) 1 120 three");
    submit(&core, "Start_Alarm(33): Group(7) 1 120 seven");

    for id in [31, 32, 33] {
        assert!(
            wait_until(
                || sink.matching(&format!("Alarm ({id}) Printed")).len() >= 3,
                LONG_WAIT
            ),
            "alarm {id} never reached three prints"
        );
    }

    let prints: Vec<(i64, u32)> = sink
        .lines()
        .iter()
        .filter(|l| l.contains("Printed by Alarm Display Thread"))
        .filter_map(|l| parse_print(l))
        .collect();

    // Steady state starts once every group has printed at least once.
    let mut seen = BTreeSet::new();
    let mut steady_from = prints.len();
    for (i, (_, group)) in prints.iter().enumerate() {
        seen.insert(*group);
        if seen.len() == 3 {
            steady_from = i + 1;
            break;
        }
    }
    let steady = &prints[steady_from..];
    assert!(
        steady.iter().map(|(_, g)| *g).collect::<BTreeSet<_>>().len() == 3,
        "steady window must cover all three groups"
    );

    // The cursor hands the turn to the next group before a group can print
    // again, so the same group never prints twice in a row.
    for pair in steady.windows(2) {
        assert_ne!(
            pair[0].1, pair[1].1,
            "group {} printed twice in a row",
            pair[0].1
        );
    }

    // Sweeps are at least two wall-seconds apart, so a second holding all
    // three groups is exactly one rotation sweep: ascending group order.
    let mut by_second: BTreeMap<i64, Vec<u32>> = BTreeMap::new();
    for (at, group) in steady {
        by_second.entry(*at).or_default().push(*group);
    }
    for (second, groups) in &by_second {
        if groups.len() == 3 {
            assert_eq!(
                groups,
                &vec![3, 5, 7],
                "sweep within second {second} out of order"
            );
        }
    }
}

/// Pulls (`at` epoch second, group id) out of a periodic print line.
fn parse_print(line: &str) -> Option<(i64, u32)> {
    let at = line
        .split(" at ")
        .nth(1)?
        .split(':')
        .next()?
        .trim()
        .parse()
        .ok()?;
    let group = line
        .split("Group(")
        .nth(1)?
        .split(')')
        .next()?
        .parse()
        .ok()?;
    Some((at, group))
}
