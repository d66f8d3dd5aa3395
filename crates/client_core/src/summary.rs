use shared::domain::Track;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    error::ClientError,
    notify::{self, NotificationKind, Notifier},
    MembersApi,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardCounts {
    pub committees: u64,
    pub members: u64,
    pub applicants: u64,
}

impl DashboardCounts {
    pub fn get(&self, track: Track) -> u64 {
        match track {
            Track::Committees => self.committees,
            Track::Members => self.members,
            Track::Applicants => self.applicants,
        }
    }

    fn slot(&mut self, track: Track) -> &mut u64 {
        match track {
            Track::Committees => &mut self.committees,
            Track::Members => &mut self.members,
            Track::Applicants => &mut self.applicants,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTile {
    pub track: Track,
    pub title: &'static str,
    pub value: u64,
    pub active: bool,
}

fn tile_title(track: Track) -> &'static str {
    match track {
        Track::Committees => "Committees",
        Track::Members => "Forum members",
        Track::Applicants => "Site applicants",
    }
}

pub async fn fetch_counts(api: &dyn MembersApi) -> Result<DashboardCounts, ClientError> {
    let (committees, members) = tokio::try_join!(api.committee_count(), api.member_counts())?;
    Ok(DashboardCounts {
        committees,
        members: members.members,
        applicants: members.applicants,
    })
}

#[derive(Debug, Default)]
pub struct DashboardSummary {
    counts: DashboardCounts,
    track: Track,
}

impl DashboardSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> DashboardCounts {
        self.counts
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn select_track(&mut self, track: Track) {
        self.track = track;
    }

    /// Stores `value` only when it differs. Returns whether the tile changed.
    pub fn set_count(&mut self, track: Track, value: u64) -> bool {
        let slot = self.counts.slot(track);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Copies the count published by a mounted members table into its tile.
    pub fn follow_member_count(&mut self, count: &watch::Receiver<usize>) -> bool {
        let members = *count.borrow();
        self.set_count(Track::Members, members as u64)
    }

    pub fn apply(&mut self, counts: DashboardCounts) -> bool {
        let mut changed = false;
        for track in Track::ALL {
            changed |= self.set_count(track, counts.get(track));
        }
        changed
    }

    pub async fn refresh(
        &mut self,
        api: &dyn MembersApi,
        notifier: &dyn Notifier,
    ) -> Result<bool, ClientError> {
        match fetch_counts(api).await {
            Ok(counts) => {
                info!(
                    committees = counts.committees,
                    members = counts.members,
                    applicants = counts.applicants,
                    "dashboard counts loaded"
                );
                Ok(self.apply(counts))
            }
            Err(err) => {
                warn!(error = %err, "failed to load dashboard counts");
                notifier.notify(notify::LOAD_FAILED, NotificationKind::Error);
                Err(err)
            }
        }
    }

    pub fn tiles(&self) -> Vec<SummaryTile> {
        Track::ALL
            .into_iter()
            .map(|track| SummaryTile {
                track,
                title: tile_title(track),
                value: self.counts.get(track),
                active: track == self.track,
            })
            .collect()
    }
}
