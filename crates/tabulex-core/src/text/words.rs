use crate::geometry::clustering::cluster_objects;
use crate::objects::{Char, Word};

/// A caller-supplied attribute key used to additionally segment words:
/// chars only merge into the same word while successive values agree
/// (mirrors pdfplumber's configurable `extra_attrs`, e.g. matching on
/// `fontname` or `size`).
pub type AttrKey = Box<dyn Fn(&Char) -> String + Send + Sync>;

/// Group characters into words based on spatial proximity.
///
/// Upright chars are read left-to-right (lines clustered by `doctop`, chars
/// ordered by `x0`); chars rotated 90 degrees are read top-to-bottom (lines
/// clustered by `x0`, chars ordered by `doctop`). `keep_blank_chars` decides
/// whether a run of whitespace becomes a word of its own rather than simply
/// ending the word before it.
pub fn group_chars_to_words(
    chars: &[Char],
    x_tolerance: f64,
    y_tolerance: f64,
    keep_blank_chars: bool,
) -> Vec<Word> {
    group_chars_to_words_with_attrs(chars, x_tolerance, y_tolerance, keep_blank_chars, &[])
}

/// Like [`group_chars_to_words`], but a word also ends when any `extra_attrs`
/// key disagrees between consecutive chars.
pub fn group_chars_to_words_with_attrs(
    chars: &[Char],
    x_tolerance: f64,
    y_tolerance: f64,
    keep_blank_chars: bool,
    extra_attrs: &[AttrKey],
) -> Vec<Word> {
    if chars.is_empty() {
        return vec![];
    }

    let upright: Vec<&Char> = chars.iter().filter(|c| c.upright).collect();
    let rotated: Vec<&Char> = chars.iter().filter(|c| !c.upright).collect();

    let mut words = words_in_orientation(
        &upright,
        true,
        x_tolerance,
        y_tolerance,
        keep_blank_chars,
        extra_attrs,
    );
    words.extend(words_in_orientation(
        &rotated,
        false,
        x_tolerance,
        y_tolerance,
        keep_blank_chars,
        extra_attrs,
    ));

    words.sort_by(|a, b| {
        a.doctop
            .partial_cmp(&b.doctop)
            .unwrap()
            .then(a.x0.partial_cmp(&b.x0).unwrap())
    });

    words
}

fn words_in_orientation(
    chars: &[&Char],
    upright: bool,
    x_tolerance: f64,
    y_tolerance: f64,
    keep_blank_chars: bool,
    extra_attrs: &[AttrKey],
) -> Vec<Word> {
    if chars.is_empty() {
        return vec![];
    }

    let line_clusters = cluster_objects(
        chars,
        |c| if upright { c.doctop } else { c.x0 },
        y_tolerance,
    );

    let mut words = Vec::new();

    for cluster in line_clusters {
        let mut line: Vec<&Char> = cluster.iter().map(|&i| chars[i]).collect();
        if upright {
            line.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap());
        } else {
            line.sort_by(|a, b| a.doctop.partial_cmp(&b.doctop).unwrap());
        }

        let mut current: Vec<&Char> = Vec::new();

        for &ch in &line {
            if ch.text.trim().is_empty() {
                flush_word(&mut current, &mut words);
                if keep_blank_chars {
                    words.push(build_word_raw(&[ch]));
                }
                continue;
            }

            let continues = match current.last() {
                None => false,
                Some(&last) => {
                    let intra_gap = if upright {
                        ch.x0 - last.x1
                    } else {
                        ch.top - last.bottom
                    };
                    let cross_gap = if upright {
                        (ch.doctop - last.doctop).abs()
                    } else {
                        (ch.x0 - last.x0).abs()
                    };
                    intra_gap.abs() <= x_tolerance
                        && cross_gap <= y_tolerance
                        && attrs_match(extra_attrs, last, ch)
                }
            };

            if !continues {
                flush_word(&mut current, &mut words);
            }
            current.push(ch);
        }

        flush_word(&mut current, &mut words);
    }

    words
}

fn attrs_match(extra_attrs: &[AttrKey], a: &Char, b: &Char) -> bool {
    extra_attrs.iter().all(|attr| attr(a) == attr(b))
}

fn flush_word<'a>(current: &mut Vec<&'a Char>, words: &mut Vec<Word>) {
    if current.is_empty() {
        return;
    }
    if let Some(word) = build_word(current) {
        words.push(word);
    }
    current.clear();
}

fn build_word(chars: &[&Char]) -> Option<Word> {
    if chars.is_empty() {
        return None;
    }

    let text: String = chars.iter().map(|c| c.text.as_str()).collect();
    if text.trim().is_empty() {
        return None;
    }

    Some(build_word_raw(chars))
}

fn build_word_raw(chars: &[&Char]) -> Word {
    let text: String = chars.iter().map(|c| c.text.as_str()).collect();
    let x0 = chars.iter().map(|c| c.x0).fold(f64::MAX, f64::min);
    let x1 = chars.iter().map(|c| c.x1).fold(f64::MIN, f64::max);
    let top = chars.iter().map(|c| c.top).fold(f64::MAX, f64::min);
    let bottom = chars.iter().map(|c| c.bottom).fold(f64::MIN, f64::max);
    let doctop = chars.iter().map(|c| c.doctop).fold(f64::MAX, f64::min);

    Word {
        text,
        x0,
        x1,
        top,
        bottom,
        doctop,
        upright: chars[0].upright,
        fontname: chars[0].fontname.clone(),
        size: chars[0].size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Char;

    fn make_char(text: &str, x0: f64, x1: f64, top: f64) -> Char {
        Char {
            text: text.to_string(),
            fontname: "Helvetica".to_string(),
            size: 12.0,
            x0,
            x1,
            top,
            bottom: top + 12.0,
            doctop: top,
            matrix: [12.0, 0.0, 0.0, 12.0, x0, 780.0 - top],
            upright: true,
            stroking_color: std::sync::Arc::new(None),
            non_stroking_color: std::sync::Arc::new(None),
            adv: x1 - x0,
        }
    }

    fn make_rotated_char(text: &str, x0: f64, top: f64, bottom: f64) -> Char {
        Char {
            upright: false,
            doctop: top,
            ..make_char(text, x0, x0 + 8.0, top).with_bottom(bottom)
        }
    }

    trait WithBottom {
        fn with_bottom(self, bottom: f64) -> Self;
    }
    impl WithBottom for Char {
        fn with_bottom(mut self, bottom: f64) -> Self {
            self.bottom = bottom;
            self
        }
    }

    #[test]
    fn test_word_grouping() {
        let chars = vec![
            make_char("H", 72.0, 80.0, 100.0),
            make_char("e", 80.0, 86.0, 100.0),
            make_char("l", 86.0, 89.0, 100.0),
            make_char("l", 89.0, 92.0, 100.0),
            make_char("o", 92.0, 98.0, 100.0),
            make_char(" ", 98.0, 101.0, 100.0),
            make_char("W", 105.0, 115.0, 100.0),
            make_char("o", 115.0, 121.0, 100.0),
            make_char("r", 121.0, 125.0, 100.0),
            make_char("l", 125.0, 128.0, 100.0),
            make_char("d", 128.0, 134.0, 100.0),
        ];

        let words = group_chars_to_words(&chars, 3.0, 3.0, false);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "Hello");
        assert_eq!(words[1].text, "World");
    }

    #[test]
    fn blank_chars_are_dropped_by_default_but_kept_on_request() {
        let chars = vec![
            make_char("a", 0.0, 6.0, 100.0),
            make_char(" ", 6.0, 12.0, 100.0),
            make_char("b", 12.0, 18.0, 100.0),
        ];

        let without_blanks = group_chars_to_words(&chars, 3.0, 3.0, false);
        assert_eq!(without_blanks.len(), 2);

        let with_blanks = group_chars_to_words(&chars, 3.0, 3.0, true);
        assert_eq!(with_blanks.len(), 3);
        assert_eq!(with_blanks[1].text, " ");
    }

    #[test]
    fn rotated_text_reads_top_to_bottom_by_doctop() {
        let chars = vec![
            make_rotated_char("A", 50.0, 10.0, 20.0),
            make_rotated_char("B", 50.0, 20.0, 30.0),
            make_rotated_char("C", 50.0, 50.0, 60.0),
        ];

        let words = group_chars_to_words(&chars, 3.0, 3.0, false);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "AB");
        assert_eq!(words[1].text, "C");
        assert!(!words[0].upright);
    }

    #[test]
    fn extra_attrs_split_words_on_font_change() {
        let mut a = make_char("a", 0.0, 6.0, 100.0);
        let mut b = make_char("b", 6.0, 12.0, 100.0);
        a.fontname = "Courier".into();
        b.fontname = "Helvetica".into();
        let chars = vec![a, b];

        let attrs: Vec<AttrKey> = vec![Box::new(|c: &Char| c.fontname.clone())];
        let words = group_chars_to_words_with_attrs(&chars, 3.0, 3.0, false, &attrs);
        assert_eq!(words.len(), 2);
    }
}
