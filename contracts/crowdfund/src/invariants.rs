#![allow(dead_code)]

extern crate std;

use crate::types::Project;

/// INV-1: `raised` must never be negative.
pub fn assert_raised_non_negative(project: &Project) {
    assert!(
        project.raised >= 0,
        "INV-1 violated: project {} has negative raised ({})",
        project.id,
        project.raised
    );
}

/// INV-2: Project goal must always be positive.
pub fn assert_goal_positive(project: &Project) {
    assert!(
        project.funding_goal > 0,
        "INV-2 violated: project {} has non-positive goal ({})",
        project.id,
        project.funding_goal
    );
}

/// INV-3: `raised` equals the sum of every donor's live contribution.
pub fn assert_raised_matches_contributions(project: &Project, contributions: &[i128]) {
    let total: i128 = contributions.iter().sum();
    assert_eq!(
        project.raised, total,
        "INV-3 violated: project {} raised {} but contributions sum to {}",
        project.id, project.raised, total
    );
}

/// INV-4: After a donation of `amount`, `raised`
/// increases by exactly `amount`.
pub fn assert_donation_invariant(raised_before: i128, raised_after: i128, amount: i128) {
    assert_eq!(
        raised_after,
        raised_before + amount,
        "INV-4 violated: donation invariant broken: {} + {} != {}",
        raised_before,
        amount,
        raised_after
    );
}

/// INV-5: Project IDs are sequential starting from 0.
pub fn assert_sequential_ids(projects: &[Project]) {
    for (i, project) in projects.iter().enumerate() {
        assert_eq!(
            project.id, i as u64,
            "INV-5 violated: expected id {}, got {}",
            i, project.id
        );
    }
}

/// INV-6: `withdrawn` only ever goes from false to true.
pub fn assert_withdrawn_monotonic(before: &Project, after: &Project) {
    assert!(
        !before.withdrawn || after.withdrawn,
        "INV-6 violated: project {} was un-withdrawn",
        after.id
    );
}

/// INV-7: Fields fixed at creation (id, goal, beneficiary, creator) never change.
pub fn assert_project_immutable_fields(original: &Project, current: &Project) {
    assert_eq!(original.id, current.id, "INV-7 violated: project id changed");
    assert_eq!(
        original.funding_goal, current.funding_goal,
        "INV-7 violated: project funding_goal changed"
    );
    assert_eq!(
        original.beneficiary, current.beneficiary,
        "INV-7 violated: project beneficiary changed"
    );
    assert_eq!(
        original.creator, current.creator,
        "INV-7 violated: project creator changed"
    );
}

/// INV-8: The contract holds at least what its open projects still owe.
pub fn assert_custody_covers(held: i128, projects: &[Project]) {
    let owed: i128 = projects
        .iter()
        .filter(|p| !p.withdrawn)
        .map(|p| p.raised)
        .sum();
    assert!(
        held >= owed,
        "INV-8 violated: contract holds {} but open projects owe {}",
        held,
        owed
    );
}

/// Run all stateless project invariants.
pub fn assert_all_project_invariants(project: &Project) {
    assert_raised_non_negative(project);
    assert_goal_positive(project);
}
