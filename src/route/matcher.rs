use std::collections::BTreeMap;

use super::node::{Element, RouteNode, Segment};
use crate::page::PageId;

// Specificity weights. Every segment also counts one on its own.
const STATIC_SCORE: i32 = 10;
const DYNAMIC_SCORE: i32 = 3;
const INDEX_SCORE: i32 = 2;
const SPLAT_PENALTY: i32 = -2;

/// RouteMatch
///
/// The winning branch of the route tree for one path: the matched nodes from
/// the outermost to the leaf, and the extracted parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<'t> {
    pub nodes: Vec<&'t RouteNode>,
    pub params: BTreeMap<String, String>,
    score: i32,
}

impl<'t> RouteMatch<'t> {
    pub fn leaf(&self) -> &'t RouteNode {
        // a match always holds at least the leaf node
        self.nodes[self.nodes.len() - 1]
    }

    /// The page the leaf renders, if it renders one.
    pub fn page(&self) -> Option<PageId> {
        match self.leaf().element() {
            Some(Element::Page(page)) => Some(*page),
            _ => None,
        }
    }

    /// The matched pattern, e.g. `/templates/:template/workspace`.
    pub fn pattern(&self) -> String {
        let parts: Vec<&str> = self
            .nodes
            .iter()
            .map(|node| node.raw_path())
            .filter(|path| !path.is_empty())
            .collect();
        format!("/{}", parts.join("/"))
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn is_catch_all(&self) -> bool {
        self.leaf().is_catch_all()
    }
}

/// resolve
///
/// Matches `path` (query string excluded) against the route tree and returns
/// the single most specific complete match. Ties go to the node declared first.
pub fn resolve<'t>(routes: &'t [RouteNode], path: &str) -> Option<RouteMatch<'t>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut candidates = Vec::new();
    let mut stack = Vec::new();
    let mut params = Vec::new();
    collect(routes, &segments, 0, 0, &mut stack, &mut params, &mut candidates);

    let mut best: Option<RouteMatch<'t>> = None;
    for candidate in candidates {
        if best.as_ref().is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    best
}

fn collect<'t>(
    nodes: &'t [RouteNode],
    segments: &[&str],
    position: usize,
    score: i32,
    stack: &mut Vec<&'t RouteNode>,
    params: &mut Vec<(String, String)>,
    out: &mut Vec<RouteMatch<'t>>,
) {
    for node in nodes {
        if node.is_index() {
            if position == segments.len() && node.element().is_some() {
                stack.push(node);
                out.push(candidate(stack, params, score + INDEX_SCORE));
                stack.pop();
            }
            continue;
        }

        let Some((next, node_score, captured)) = match_segments(node, segments, position) else {
            continue;
        };

        let params_len = params.len();
        params.extend(captured);
        stack.push(node);
        let score = score + node_score;

        if next == segments.len() && node.element().is_some() {
            out.push(candidate(stack, params, score));
        }
        if !node.child_nodes().is_empty() {
            collect(node.child_nodes(), segments, next, score, stack, params, out);
        }

        stack.pop();
        params.truncate(params_len);
    }
}

/// Matches one node's own segments at `position`. Returns the next position,
/// the score earned and the captured parameters.
fn match_segments(
    node: &RouteNode,
    segments: &[&str],
    position: usize,
) -> Option<(usize, i32, Vec<(String, String)>)> {
    let mut position = position;
    let mut score = 0;
    let mut captured = Vec::new();

    for segment in node.segments() {
        match segment {
            Segment::Splat => {
                let rest = segments[position..].join("/");
                captured.push(("*".to_string(), decode(&rest)));
                position = segments.len();
                score += 1 + SPLAT_PENALTY;
            }
            Segment::Static(literal) => {
                let value = segments.get(position)?;
                if !value.eq_ignore_ascii_case(literal) {
                    return None;
                }
                position += 1;
                score += 1 + STATIC_SCORE;
            }
            Segment::Param(name) => {
                let value = segments.get(position)?;
                captured.push((name.clone(), decode(value)));
                position += 1;
                score += 1 + DYNAMIC_SCORE;
            }
            Segment::Prefixed { prefix, name } => {
                let value = segments.get(position)?;
                let rest = value.strip_prefix(prefix.as_str()).filter(|r| !r.is_empty())?;
                captured.push((name.clone(), decode(rest)));
                position += 1;
                score += 1 + STATIC_SCORE;
            }
        }
    }

    Some((position, score, captured))
}

fn candidate<'t>(
    stack: &[&'t RouteNode],
    params: &[(String, String)],
    score: i32,
) -> RouteMatch<'t> {
    RouteMatch {
        nodes: stack.to_vec(),
        params: params.iter().cloned().collect(),
        score,
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|value| value.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
