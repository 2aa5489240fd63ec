// Playability diagnostics - explains why a watch page carried no formats
//
// The player response embedded in the watch page has a `playabilityStatus`
// object with a machine status ("OK", "LOGIN_REQUIRED", "UNPLAYABLE", ...)
// and a free-form reason. This module maps both onto a small set of reasons
// so a failed page scrape shows up in the logs with something actionable.

use serde_json::Value;

/// Reasons why YouTube refuses to hand out formats on the watch page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// "Sign in to confirm you're not a bot" and friends
    BotDetection,

    /// Age-gated content requiring login
    AgeRestricted,

    /// Geographic restriction
    GeoBlocked,

    /// Private video requiring authorization
    PrivateVideo,

    /// Members-only content
    MembersOnly,

    /// Video deleted, terminated account or otherwise gone
    VideoUnavailable,

    /// Scheduled or ended live stream with nothing to play yet
    LiveStreamOffline,

    /// Generic login wall
    LoginRequired,

    /// Anything else
    Unknown,
}

impl BlockingReason {
    /// Check if this is a permanent restriction (mirrors won't help either)
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::VideoUnavailable | Self::PrivateVideo)
    }

    /// Check if another strategy has a realistic chance
    pub fn other_sources_might_help(&self) -> bool {
        matches!(
            self,
            Self::BotDetection | Self::GeoBlocked | Self::LoginRequired | Self::AgeRestricted
        )
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::BotDetection => "Bot detection triggered",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geographic restriction",
            Self::PrivateVideo => "Private video",
            Self::MembersOnly => "Members-only content",
            Self::VideoUnavailable => "Video unavailable",
            Self::LiveStreamOffline => "Live stream offline",
            Self::LoginRequired => "Login required",
            Self::Unknown => "Unknown playability problem",
        }
    }
}

/// Classify a `playabilityStatus` status/reason pair. Returns `None` for "OK".
pub fn diagnose_playability(status: &str, reason: &str) -> Option<BlockingReason> {
    if status.eq_ignore_ascii_case("OK") {
        return None;
    }

    let lower = reason.to_lowercase();

    if lower.contains("not a bot")
        || lower.contains("unusual traffic")
        || lower.contains("captcha")
    {
        return Some(BlockingReason::BotDetection);
    }

    if status.starts_with("AGE_")
        || lower.contains("confirm your age")
        || lower.contains("age-restricted")
        || lower.contains("inappropriate for some users")
    {
        return Some(BlockingReason::AgeRestricted);
    }

    if lower.contains("members")
        || lower.contains("join this channel")
    {
        return Some(BlockingReason::MembersOnly);
    }

    if lower.contains("private video")
        || lower.contains("video is private")
    {
        return Some(BlockingReason::PrivateVideo);
    }

    if lower.contains("not available in your country")
        || lower.contains("uploader has not made this video available")
    {
        return Some(BlockingReason::GeoBlocked);
    }

    if status == "LIVE_STREAM_OFFLINE" || lower.contains("premieres in") {
        return Some(BlockingReason::LiveStreamOffline);
    }

    if lower.contains("video unavailable")
        || lower.contains("no longer available")
        || lower.contains("has been removed")
        || lower.contains("account associated with this video has been terminated")
    {
        return Some(BlockingReason::VideoUnavailable);
    }

    if status == "LOGIN_REQUIRED" {
        return Some(BlockingReason::LoginRequired);
    }

    if status == "ERROR" {
        return Some(BlockingReason::VideoUnavailable);
    }

    Some(BlockingReason::Unknown)
}

/// Read `playabilityStatus` from a player response and classify it.
/// Returns the reason together with the raw message for logging.
pub fn diagnose_player_response(player: &Value) -> Option<(BlockingReason, String)> {
    let playability = &player["playabilityStatus"];
    let status = playability["status"].as_str()?;
    let message = playability["reason"]
        .as_str()
        .or_else(|| playability["messages"][0].as_str())
        .unwrap_or("")
        .to_string();

    diagnose_playability(status, &message).map(|reason| (reason, message))
}
