//! Canvas 2D keyword strings for the surface enums.

use roulette_core::{TextAlign, TextBaseline};

pub fn text_align(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
    }
}

pub fn text_baseline(baseline: TextBaseline) -> &'static str {
    match baseline {
        TextBaseline::Top => "top",
        TextBaseline::Middle => "middle",
        TextBaseline::Alphabetic => "alphabetic",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(text_align(TextAlign::Center), "center");
        assert_eq!(text_align(TextAlign::Left), "left");
        assert_eq!(text_baseline(TextBaseline::Top), "top");
        assert_eq!(text_baseline(TextBaseline::Alphabetic), "alphabetic");
    }
}
