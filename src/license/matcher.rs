use crate::license::templates::Template;
use crate::license::words::WordSet;

/// Best template for one candidate license file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult<'a> {
    pub template: Option<&'a Template>,
    /// Dice coefficient in `[0, 1]`.
    pub score: f64,
    /// Candidate words the template does not have, in candidate order.
    pub extra_words: Vec<String>,
    /// Template words the candidate does not have, in template order.
    pub missing_words: Vec<String>,
}

/// Dice coefficient over the two word sets. Two empty sets score 0.
pub fn dice(a: &WordSet, b: &WordSet) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    2.0 * a.common(b) as f64 / total as f64
}

/// Return the template whose word set is closest to `words`.
///
/// Ties go to the template seen first. With an empty corpus there is no
/// template and the score is 0.
pub fn match_templates<'a>(words: &WordSet, templates: &'a [Template]) -> MatchResult<'a> {
    let mut best_score = -1.0;
    let mut best: Option<&'a Template> = None;

    for template in templates {
        let score = dice(words, &template.words);
        if score > best_score {
            best_score = score;
            best = Some(template);
        }
    }

    match best {
        Some(template) => MatchResult {
            template: Some(template),
            score: best_score,
            extra_words: words.difference(&template.words),
            missing_words: template.words.difference(words),
        },
        None => MatchResult::default(),
    }
}
