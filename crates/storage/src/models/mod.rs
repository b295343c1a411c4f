mod event;
mod leaderboard;

pub use event::{Event, EventRound, EventRoundUser, EventUser};
pub use leaderboard::{EventLeaderboardRow, EventRoundLeaderboardRow, EventWithRoundRow};
