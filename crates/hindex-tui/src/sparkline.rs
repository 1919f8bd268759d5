// Sparkline rendering for the compact layout

/// Generate a sparkline visualization using Unicode block characters
/// Characters: ▁ ▂ ▃ ▄ ▅ ▆ ▇ █
pub fn render_sparkline(data: &[u64]) -> String {
    if data.is_empty() {
        return String::new();
    }

    let chars = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let max = data.iter().copied().max().unwrap_or(0);

    if max == 0 {
        return "▁".repeat(data.len());
    }

    data.iter()
        .map(|&v| {
            let ratio = (v as f64 / max as f64 * 7.0).clamp(0.0, 7.0);
            chars[ratio as usize]
        })
        .collect()
}
