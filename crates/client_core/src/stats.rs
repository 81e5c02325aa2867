use shared::protocol::FrameStats;

/// Display strings mirrored from the latest frame stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsMirror {
    pub rgb_fps: String,
    pub seg_fps: String,
    pub mode: String,
    pub prompt_status: String,
}

impl Default for StatsMirror {
    fn default() -> Self {
        Self {
            rgb_fps: "-".into(),
            seg_fps: "-".into(),
            mode: "-".into(),
            prompt_status: "-".into(),
        }
    }
}

impl From<&FrameStats> for StatsMirror {
    fn from(stats: &FrameStats) -> Self {
        let summary = &stats.prompt_summary;
        let text = summary
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or("-");
        Self {
            rgb_fps: stats.rgb_fps.to_string(),
            seg_fps: stats.seg_fps.to_string(),
            mode: stats.mode.clone(),
            prompt_status: format!("T: {text}, P: {}, B: {}", summary.points, summary.boxes),
        }
    }
}

#[cfg(test)]
mod tests {
    use shared::protocol::PromptSummary;

    use super::*;

    #[test]
    fn empty_prompt_text_shows_dash() {
        let mirror = StatsMirror::from(&FrameStats {
            rgb_fps: 29.5,
            seg_fps: 0.0,
            mode: "interactive".into(),
            prompt_summary: PromptSummary {
                text: Some(String::new()),
                points: 3,
                boxes: 1,
            },
        });
        assert_eq!(mirror.rgb_fps, "29.5");
        assert_eq!(mirror.seg_fps, "0");
        assert_eq!(mirror.prompt_status, "T: -, P: 3, B: 1");
    }

    #[test]
    fn shows_text_prompt_when_present() {
        let mirror = StatsMirror::from(&FrameStats {
            prompt_summary: PromptSummary {
                text: Some("red car".into()),
                points: 0,
                boxes: 0,
            },
            ..FrameStats::default()
        });
        assert_eq!(mirror.prompt_status, "T: red car, P: 0, B: 0");
    }
}
