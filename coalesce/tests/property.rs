//! Randomized schedules on simulated time: a callback scheduled at `t0` with
//! delay `d` has not fired at `t0 + d - 1` and has fired exactly once by `t0 + d`.

use coalesce::{Clock, CoalescerBuilder, SimHost, Timestamp};
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy)]
enum Step {
    Schedule { tester: usize, delay: u64 },
    ExpectPending(usize),
    ExpectFired(usize),
}

fn run_timeline(testers: &[(u64, u64)]) -> Result<(), TestCaseError> {
    let host = SimHost::new();
    let timers = CoalescerBuilder::new().build(host.clone());
    let counts = Rc::new(RefCell::new(vec![0u32; testers.len()]));

    let mut timeline: BTreeMap<u64, Vec<Step>> = BTreeMap::new();
    for (tester, &(at, delay)) in testers.iter().enumerate() {
        timeline.entry(at).or_default().push(Step::Schedule { tester, delay });
        // at >= 10, so a zero delay cannot underflow
        timeline.entry(at + delay - 1).or_default().push(Step::ExpectPending(tester));
        timeline.entry(at + delay).or_default().push(Step::ExpectFired(tester));
    }

    for (time, steps) in timeline {
        host.tick_to(Timestamp::from_millis(time));
        for step in steps {
            match step {
                Step::Schedule { tester, delay } => {
                    let counts = counts.clone();
                    timers.schedule(move || counts.borrow_mut()[tester] += 1, delay);
                }
                Step::ExpectPending(tester) => {
                    prop_assert_eq!(counts.borrow()[tester], 0, "tester {} fired early at {}", tester, time);
                }
                Step::ExpectFired(tester) => {
                    prop_assert_eq!(counts.borrow()[tester], 1, "tester {} not fired once by {}", tester, time);
                }
            }
            host.tick(0);
        }
    }

    host.tick(1_000);
    prop_assert!(counts.borrow().iter().all(|&count| count == 1));
    prop_assert!(timers.is_empty());
    prop_assert_eq!(host.pending_timers(), 0);
    Ok(())
}

proptest! {
    #[test]
    fn callbacks_fire_exactly_at_their_deadline(
        testers in prop::collection::vec((10u64..=210, 0u64..=200), 0..40)
    ) {
        run_timeline(&testers)?;
    }

    #[test]
    fn one_jump_fires_everything_once_in_deadline_order(
        rounds in prop::collection::vec((0u64..=50, prop::collection::vec(0u64..=500, 1..20)), 1..6)
    ) {
        let host = SimHost::new();
        let timers = CoalescerBuilder::new().build(host.clone());
        let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
        let mut deadlines = Vec::new();

        for (gap, delays) in &rounds {
            host.tick(*gap);
            for &delay in delays {
                let id = deadlines.len();
                deadlines.push(host.now().saturating_add(delay));
                let seen = seen.clone();
                timers.schedule(move || seen.borrow_mut().push(id), delay);
            }
        }

        let before_jump = seen.borrow().len();
        host.tick(10_000);

        let seen = seen.borrow();
        prop_assert_eq!(seen.len(), deadlines.len());
        let mut ids = seen.clone();
        let order: Vec<Timestamp> = ids.iter().map(|&id| deadlines[id]).collect();
        prop_assert!(order[before_jump..].windows(2).all(|pair| pair[0] <= pair[1]));
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), deadlines.len());
    }
}
