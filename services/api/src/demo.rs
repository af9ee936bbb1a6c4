use crate::infra::{seeded_directory, ProjectPhase, DEMO_PROJECT};
use clap::Args;
use teamup::error::AppError;
use teamup::workflows::matchmaking::applications::{ApplicantBoard, Decision};
use teamup::workflows::matchmaking::reviews::PeerReviewTracker;
use teamup::workflows::matchmaking::UserId;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the peer-review portion of the demo.
    #[arg(long)]
    pub(crate) skip_reviews: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let directory = seeded_directory();
    let leader = UserId::new("s-1001");

    println!("Matchmaking demo: applicant decisions");
    let board = ApplicantBoard::new(directory.clone(), DEMO_PROJECT, leader.clone());
    let applicants = match board.load().await {
        Ok(applicants) => applicants,
        Err(err) => {
            println!("  Could not load applicants: {err}");
            return Ok(());
        }
    };
    for applicant in &applicants {
        println!(
            "- {} ({}) applied {}: \"{}\"",
            applicant.name, applicant.applicant_id, applicant.applied_date, applicant.motivation
        );
    }

    let decisions = [
        (1, Decision::Accepted),
        (2, Decision::Accepted),
        (3, Decision::Rejected),
    ];
    for (application, decision) in decisions {
        let id = teamup::workflows::matchmaking::applications::ApplicationId(application);
        match board.transition(&id, decision).await {
            Ok(()) => println!("  Application {application}: {:?} confirmed", decision),
            Err(err) => println!("  Application {application}: {err}"),
        }
    }

    let counts = board.status_counts();
    println!(
        "  Board now shows {} pending / {} accepted / {} rejected (total {})",
        counts.pending,
        counts.accepted,
        counts.rejected,
        counts.total()
    );

    // Deciding twice demonstrates the pending-only guard.
    let first = teamup::workflows::matchmaking::applications::ApplicationId(1);
    if let Err(err) = board.transition(&first, Decision::Rejected).await {
        println!("  Second decision on application 1 refused: {err}");
    }

    // A non-leader view never reaches the applicant data.
    let intruder = ApplicantBoard::new(directory.clone(), DEMO_PROJECT, UserId::new("s-2001"));
    if let Err(err) = intruder.load().await {
        println!("  Non-leader load refused: {err}");
    }

    if args.skip_reviews {
        return Ok(());
    }

    println!("\nMatchmaking demo: peer reviews");
    let reviewer = UserId::new("s-2001");
    let tracker = PeerReviewTracker::new(directory.clone(), DEMO_PROJECT, reviewer);
    if let Err(err) = tracker.load().await {
        println!("  Could not load the review roster: {err}");
        return Ok(());
    }

    // The project is still recruiting, so the directory refuses the first
    // submission and the entered draft survives for a later retry.
    let dana = UserId::new("s-1001");
    let _ = tracker.set_score(&dana, 5);
    let _ = tracker.set_comment(&dana, "Kept the scope realistic and unblocked everyone.");
    if let Err(err) = tracker.submit(&dana).await {
        println!("  Early submission refused: {err}");
    }

    directory.set_phase(DEMO_PROJECT, ProjectPhase::Completed);
    println!("  Project marked completed; retrying with the preserved draft");

    for view in tracker.members() {
        let id = view.member.id.clone();
        if view.score.is_none() {
            let _ = tracker.set_score(&id, 4);
            let _ = tracker.set_comment(&id, "Reliable teammate, easy to collaborate with.");
        }
        match tracker.submit(&id).await {
            Ok(()) => println!("  Review for {} submitted", view.member.name),
            Err(err) => println!("  Review for {} failed: {err}", view.member.name),
        }
    }

    if let Err(err) = tracker.submit(&dana).await {
        println!("  Duplicate review refused: {err}");
    }

    println!(
        "  Review phase complete for this member: {}",
        tracker.is_complete()
    );
    Ok(())
}
