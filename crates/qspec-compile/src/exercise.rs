//! Question-spec compilation.

use qspec_tree::{Attribute, Node, flatten_text};

use crate::cloze::substitute_blanks;
use crate::error::CompileError;
use crate::heading_id::assign_heading_ids;
use crate::policy::{PathPolicy, id_prefix};
use crate::scoring::{ScoringItem, parse_scoring};
use crate::sections::SectionMap;

/// Exam-tip marker headings, matched against trimmed depth-3 heading
/// text.
const EXAM_MARKERS: [&str; 2] = ["Exam", "exam"];
/// Title of the synthesized exam-tip admonition.
const EXAM_TIP_TITLE: &str = "本試験では";
/// Title of the synthesized scoring admonition.
const SCORING_TITLE: &str = "採点基準・配点";

/// Compiles question-spec documents into a single `Exercise` element.
///
/// Construction is cheap and the compiler is stateless across documents;
/// one instance can serve any number of [`compile`](Self::compile)
/// calls.
#[derive(Debug, Clone, Default)]
pub struct ExerciseCompiler {
    policy: PathPolicy,
}

impl ExerciseCompiler {
    pub fn new(policy: PathPolicy) -> Self {
        Self { policy }
    }

    /// Compile the document in place if `path` denotes a question spec.
    ///
    /// Returns whether the document was compiled. Paths outside the
    /// policy and empty documents are left untouched. Structural
    /// violations abort the document with an error naming `path`; the
    /// tree may be partially section-partitioned at that point and must
    /// be discarded by the caller.
    pub fn compile(&self, root: &mut Node, path: &str) -> Result<bool, CompileError> {
        if !self.policy.is_question_spec(path) {
            return Ok(false);
        }
        let Some(children) = root.children_mut() else {
            return Ok(false);
        };
        if children.is_empty() {
            return Ok(false);
        }

        if matches!(
            children.first(),
            Some(Node::Yaml { .. } | Node::Toml { .. })
        ) {
            return Err(CompileError::Frontmatter {
                path: path.to_owned(),
            });
        }

        let title = match children.first() {
            Some(node) if node.is_heading(1) => flatten_text(node).trim().to_owned(),
            _ => {
                return Err(CompileError::MissingTitle {
                    path: path.to_owned(),
                });
            }
        };
        if title.is_empty() {
            return Err(CompileError::EmptyTitle {
                path: path.to_owned(),
            });
        }

        let body = children.split_off(1);
        let mut sections = SectionMap::partition(body);

        let type_value = sections
            .get("Type")
            .unwrap_or_default()
            .iter()
            .map(flatten_text)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_lowercase();
        if type_value.is_empty() {
            return Err(CompileError::MissingType {
                path: path.to_owned(),
            });
        }
        let is_cloze = type_value == "cloze";

        let prompt = sections.take("Prompt");
        if prompt.is_empty() {
            return Err(CompileError::MissingPrompt {
                path: path.to_owned(),
            });
        }

        let mut options = sections.take("Options");
        let mut explanation = sections.take("Explanation");
        let (mut prompt, mut exam_tips) = split_exam_tips(prompt);
        let scoring = parse_scoring(sections.get("Scoring").unwrap_or_default());

        if is_cloze {
            substitute_blanks(&mut prompt);
            substitute_blanks(&mut exam_tips);
            substitute_blanks(&mut options);
            substitute_blanks(&mut explanation);
        }

        let prefix = id_prefix(path);
        assign_heading_ids(&mut prompt, &prefix);
        assign_heading_ids(&mut exam_tips, &prefix);
        assign_heading_ids(&mut options, &prefix);
        assign_heading_ids(&mut explanation, &prefix);

        let mut exercise_children = prompt;
        exercise_children.append(&mut options);
        if !exam_tips.is_empty() {
            exercise_children.push(admonition("tip", EXAM_TIP_TITLE, exam_tips));
        }
        if !scoring.is_empty() {
            exercise_children.push(admonition(
                "info",
                SCORING_TITLE,
                vec![scoring_list(&scoring)],
            ));
        }
        exercise_children.push(Node::jsx_element("Solution", vec![], explanation));

        let mut attributes = vec![Attribute::string("title", title)];
        if is_cloze {
            attributes.push(Attribute::flag("enableBlanks"));
        }

        *children = vec![Node::jsx_element(
            "Exercise",
            attributes,
            exercise_children,
        )];
        Ok(true)
    }
}

/// Pull every exam-tip block out of the prompt sequence.
///
/// A block starts at a depth-3 heading whose trimmed text is an exam
/// marker and runs until the next depth-3 heading. The marker heading
/// itself is dropped; all blocks concatenate into one tip sequence and
/// the surrounding prompt keeps its original order.
fn split_exam_tips(nodes: Vec<Node>) -> (Vec<Node>, Vec<Node>) {
    let mut remaining = Vec::with_capacity(nodes.len());
    let mut tips = Vec::new();
    let mut in_tip = false;
    for node in nodes {
        if node.is_heading(3) {
            in_tip = EXAM_MARKERS.contains(&flatten_text(&node).trim());
            if in_tip {
                continue;
            }
        }
        if in_tip {
            tips.push(node);
        } else {
            remaining.push(node);
        }
    }
    (remaining, tips)
}

fn admonition(kind: &str, title: &str, children: Vec<Node>) -> Node {
    Node::jsx_element(
        "Admonition",
        vec![
            Attribute::string("type", kind),
            Attribute::string("title", title),
        ],
        children,
    )
}

fn scoring_list(items: &[ScoringItem]) -> Node {
    let children = items
        .iter()
        .map(|item| Node::ListItem {
            spread: false,
            checked: None,
            children: vec![Node::paragraph(vec![Node::text(format!(
                "{}：{}点",
                item.description, item.points
            ))])],
        })
        .collect();
    Node::List {
        ordered: false,
        start: None,
        spread: false,
        children,
    }
}
