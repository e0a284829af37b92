use crate::scheduler::queue::QueueJob;

use super::Symbol;

/// Sum reserved slots per user, keeping first-seen order.
fn totals_by_user(jobs: &[QueueJob]) -> Vec<(&str, u64)> {
    let mut totals: Vec<(&str, u64)> = Vec::new();
    for job in jobs {
        match totals.iter_mut().find(|(user, _)| *user == job.user) {
            Some((_, total)) => *total += u64::from(job.slots),
            None => totals.push((job.user.as_str(), u64::from(job.slots))),
        }
    }
    totals
}

pub fn classify_reservation(jobs: &[QueueJob], equipped_cpus: u32) -> Symbol {
    let totals = totals_by_user(jobs);
    let equipped = u64::from(equipped_cpus);

    match totals.as_slice() {
        [] => Symbol::NoJob,
        [(user, total)] if *total == equipped => Symbol::Owner((*user).to_string()),
        [_] => Symbol::Slack,
        many if many.iter().map(|(_, t)| t).sum::<u64>() == equipped => Symbol::FullEffort,
        _ => Symbol::Slack,
    }
}
