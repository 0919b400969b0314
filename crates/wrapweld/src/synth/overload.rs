//! Overload shape synthesis
//!
//! The metadata only says how many trailing parameters are optional, never
//! which ones, so every reachable prefix length gets its own overload.

use serde::{Deserialize, Serialize};

/// Arity and shape of one overload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverloadShape {
    /// Positional parameters accepted
    pub arity: usize,
    /// Whether a keyword-map parameter follows
    pub keyword_tail: bool,
}

impl OverloadShape {
    pub fn positional(arity: usize) -> Self {
        Self {
            arity,
            keyword_tail: false,
        }
    }

    pub fn with_keyword_tail(arity: usize) -> Self {
        Self {
            arity,
            keyword_tail: true,
        }
    }
}

/// Shapes for a module-level callable: one positional overload per arity in `0..=total`
pub fn module_shapes(total: usize) -> Vec<OverloadShape> {
    (0..=total).map(OverloadShape::positional).collect()
}

/// Shapes for a method
///
/// `params_with_receiver` counts the implicit receiver. Positional
/// overloads cover `required..=total`; a keyword-tail overload at
/// `required` is added when any parameter is optional.
pub fn method_shapes(params_with_receiver: usize, optional: usize) -> Vec<OverloadShape> {
    let total = params_with_receiver.saturating_sub(1);
    let required = total.saturating_sub(optional);

    let mut shapes: Vec<OverloadShape> = (required..=total).map(OverloadShape::positional).collect();
    if optional > 0 {
        shapes.push(OverloadShape::with_keyword_tail(required));
    }
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arities(shapes: &[OverloadShape]) -> Vec<usize> {
        shapes.iter().filter(|s| !s.keyword_tail).map(|s| s.arity).collect()
    }

    #[test]
    fn test_module_shapes_cover_every_prefix() {
        for total in 0..8 {
            let shapes = module_shapes(total);
            assert_eq!(shapes.len(), total + 1);
            assert_eq!(arities(&shapes), (0..=total).collect::<Vec<_>>());
            assert!(shapes.iter().all(|s| !s.keyword_tail));
        }
    }

    #[test]
    fn test_method_shapes_counts() {
        for with_receiver in 0..7usize {
            for optional in 0..=with_receiver {
                let shapes = method_shapes(with_receiver, optional);
                let total = with_receiver.saturating_sub(1);
                let required = total.saturating_sub(optional);

                assert_eq!(arities(&shapes), (required..=total).collect::<Vec<_>>());
                let tails: Vec<_> = shapes.iter().filter(|s| s.keyword_tail).collect();
                if optional > 0 {
                    assert_eq!(tails.len(), 1);
                    assert_eq!(tails[0].arity, required);
                } else {
                    assert!(tails.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_method_without_receiver() {
        assert_eq!(method_shapes(0, 0), vec![OverloadShape::positional(0)]);
    }

    #[test]
    fn test_method_with_optional_tail() {
        // query(self, expr, inplace=False, **kwargs)
        assert_eq!(
            method_shapes(4, 2),
            vec![
                OverloadShape::positional(1),
                OverloadShape::positional(2),
                OverloadShape::positional(3),
                OverloadShape::with_keyword_tail(1),
            ]
        );
    }
}
