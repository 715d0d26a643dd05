use std::fmt;

/// Running audio/video summary of the tags scanned so far.
///
/// Counts only ever go up and start timestamps are fixed by the first tag of
/// each kind, so the fields are read-only outside [`BodyInfo::record_audio`]
/// and [`BodyInfo::record_video`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyInfo {
    audio_count: u64,
    audio_start_timestamp: u32,
    audio_end_timestamp: u32,
    video_count: u64,
    video_start_timestamp: u32,
    video_end_timestamp: u32,
}

impl BodyInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one audio tag. Returns its 1-based audio sequence index.
    pub fn record_audio(&mut self, timestamp_ms: u32) -> u64 {
        self.audio_count += 1;
        if self.audio_count == 1 {
            self.audio_start_timestamp = timestamp_ms;
        }
        self.audio_end_timestamp = timestamp_ms;
        self.audio_count
    }

    /// Account for one video tag. Returns its 1-based video sequence index.
    pub fn record_video(&mut self, timestamp_ms: u32) -> u64 {
        self.video_count += 1;
        if self.video_count == 1 {
            self.video_start_timestamp = timestamp_ms;
        }
        self.video_end_timestamp = timestamp_ms;
        self.video_count
    }

    pub fn audio_count(&self) -> u64 {
        self.audio_count
    }

    pub fn audio_start_timestamp(&self) -> u32 {
        self.audio_start_timestamp
    }

    pub fn audio_end_timestamp(&self) -> u32 {
        self.audio_end_timestamp
    }

    pub fn video_count(&self) -> u64 {
        self.video_count
    }

    pub fn video_start_timestamp(&self) -> u32 {
        self.video_start_timestamp
    }

    pub fn video_end_timestamp(&self) -> u32 {
        self.video_end_timestamp
    }

    /// End minus start timestamp; 0 if timestamps went backwards.
    pub fn audio_duration_ms(&self) -> u32 {
        self.audio_end_timestamp
            .saturating_sub(self.audio_start_timestamp)
    }

    pub fn video_duration_ms(&self) -> u32 {
        self.video_end_timestamp
            .saturating_sub(self.video_start_timestamp)
    }
}

impl fmt::Display for BodyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FLV Body: \n\
            Audio Tags: {} ({} ms .. {} ms)\n\
            Video Tags: {} ({} ms .. {} ms)",
            self.audio_count,
            self.audio_start_timestamp,
            self.audio_end_timestamp,
            self.video_count,
            self.video_start_timestamp,
            self.video_end_timestamp
        )
    }
}
