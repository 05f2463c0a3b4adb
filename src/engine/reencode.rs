//! Filter-graph re-encode concatenation (tier 2)

use crate::domain::model::Combination;

/// Fixed output parameters for re-encoded combinations
#[derive(Debug, Clone, PartialEq)]
pub struct ReencodeProfile {
    /// Output frame rate
    pub frame_rate: u32,
    /// Video encoder
    pub video_codec: &'static str,
    /// Constant quality scale for the video encoder (lower is better)
    pub video_quality: u8,
    /// Audio encoder
    pub audio_codec: &'static str,
    /// Audio bitrate
    pub audio_bitrate: &'static str,
}

impl Default for ReencodeProfile {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            video_codec: "mpeg4",
            video_quality: 2,
            audio_codec: "aac",
            audio_bitrate: "128k",
        }
    }
}

/// Re-encoding concatenation that tolerates mismatched inputs
#[derive(Debug, Clone, Default)]
pub struct ReencodeConcat {
    profile: ReencodeProfile,
}

impl ReencodeConcat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &ReencodeProfile {
        &self.profile
    }

    /// Filter graph normalising SAR and audio timing of `inputs` streams, then concatenating them
    pub fn filter_graph(&self, inputs: usize) -> String {
        let mut graph = String::new();
        for i in 0..inputs {
            graph.push_str(&format!("[{i}:v]setsar=1[v{i}];"));
        }
        for i in 0..inputs {
            graph.push_str(&format!("[{i}:a]aresample=async=1[a{i}];"));
        }
        for i in 0..inputs {
            graph.push_str(&format!("[v{i}][a{i}]"));
        }
        graph.push_str(&format!("concat=n={inputs}:v=1:a=1[v][a]"));
        graph
    }

    /// Engine arguments re-encoding the combination into `output`
    pub fn argv(&self, combo: &Combination, output: &str) -> Vec<String> {
        let parts = combo.parts();
        let mut argv = Vec::with_capacity(26);
        for part in parts.iter() {
            argv.push("-i".to_string());
            argv.push(part.storage_name());
        }

        let profile = &self.profile;
        argv.extend([
            "-filter_complex".to_string(),
            self.filter_graph(parts.len()),
            "-map".to_string(),
            "[v]".to_string(),
            "-map".to_string(),
            "[a]".to_string(),
            "-r".to_string(),
            profile.frame_rate.to_string(),
            "-c:v".to_string(),
            profile.video_codec.to_string(),
            "-qscale:v".to_string(),
            profile.video_quality.to_string(),
            "-c:a".to_string(),
            profile.audio_codec.to_string(),
            "-b:a".to_string(),
            profile.audio_bitrate.to_string(),
            output.to_string(),
        ]);
        argv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Clip;

    #[test]
    fn test_filter_graph_for_three_inputs() {
        let graph = ReencodeConcat::new().filter_graph(3);
        assert_eq!(
            graph,
            "[0:v]setsar=1[v0];[1:v]setsar=1[v1];[2:v]setsar=1[v2];\
             [0:a]aresample=async=1[a0];[1:a]aresample=async=1[a1];[2:a]aresample=async=1[a2];\
             [v0][a0][v1][a1][v2][a2]concat=n=3:v=1:a=1[v][a]"
        );
    }

    #[test]
    fn test_reencode_argv() {
        let hook = Clip::new("h.mp4", vec![0u8]);
        let body = Clip::new("b.mp4", vec![0u8]);
        let mut cta = Clip::new("c.mp4", vec![0u8]);
        cta.index = 2;
        let combo = Combination::new(&hook, &body, &cta);

        let argv = ReencodeConcat::new().argv(&combo, "output_h1_b1_c3.mp4");
        let inputs: Vec<&str> = argv[..6].iter().map(String::as_str).collect();
        assert_eq!(
            inputs,
            vec!["-i", "hook_0.mp4", "-i", "body_0.mp4", "-i", "cta_2.mp4"]
        );
        assert_eq!(argv[6], "-filter_complex");

        let tail: Vec<&str> = argv[8..].iter().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec![
                "-map", "[v]", "-map", "[a]", "-r", "30", "-c:v", "mpeg4", "-qscale:v", "2",
                "-c:a", "aac", "-b:a", "128k", "output_h1_b1_c3.mp4",
            ]
        );
    }

    #[test]
    fn test_default_profile() {
        let profile = ReencodeProfile::default();
        assert_eq!(profile.frame_rate, 30);
        assert_eq!(profile.audio_bitrate, "128k");
    }
}
