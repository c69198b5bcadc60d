//! Fused trees must evaluate exactly like the trees they came from.

use std::collections::HashMap;

use proptest::prelude::*;
use rapids_fusion::expr::{ExprNode, ExprRef, Literal, Operand, Operator};
use rapids_fusion::optimizer::default_registry;
use rapids_fusion::schema::ColumnCountCache;
use rapids_fusion::{FuseStrategy, Fuser};

/// A frame is its list of column values; a column value is a readable tag.
type Frame = Vec<String>;

/// Deterministic evaluator over `frame`, `append`, `cbind` and `cols_py`.
fn evaluate(expr: &ExprNode, catalog: &HashMap<String, usize>) -> Result<Frame, String> {
    match expr.op() {
        Operator::Frame => {
            let key = literal(expr, 0)?
                .as_str()
                .ok_or("frame key is not a string")?;
            let ncols = catalog.get(key).ok_or(format!("unknown frame {}", key))?;
            Ok((0..*ncols).map(|i| format!("{}.{}", key, i)).collect())
        }
        Operator::Append => {
            let mut frame = evaluate(frame_arg(expr, 0)?, catalog)?;
            let items = &expr.children()[1..];
            if items.len() % 2 != 0 {
                return Err("append items must be (value, name) pairs".to_string());
            }
            for pair in items.chunks(2) {
                frame.push(format!("{}={}", pair[1], pair[0]));
            }
            Ok(frame)
        }
        Operator::Cbind => {
            let mut frame = vec![];
            for i in 0..expr.arity() {
                frame.extend(evaluate(frame_arg(expr, i)?, catalog)?);
            }
            Ok(frame)
        }
        Operator::ColumnSelect => {
            let frame = evaluate(frame_arg(expr, 0)?, catalog)?;
            let k = literal(expr, 1)?
                .as_int()
                .ok_or("selector is not an integer")?;
            usize::try_from(k)
                .ok()
                .and_then(|k| frame.get(k))
                .map(|column| vec![column.clone()])
                .ok_or(format!("column {} out of range for {} columns", k, frame.len()))
        }
        other => Err(format!("cannot evaluate {}", other)),
    }
}

fn frame_arg(expr: &ExprNode, i: usize) -> Result<&ExprRef, String> {
    expr.expr_arg(i).map_err(|e| e.to_string())
}

fn literal(expr: &ExprNode, i: usize) -> Result<&Literal, String> {
    expr.arg(i)
        .map_err(|e| e.to_string())?
        .as_literal()
        .ok_or(format!("operand {} is not a literal", i))
}

#[derive(Debug, Clone)]
enum Shape {
    Frame { ncols: usize, known: bool },
    Append { base: Box<Shape>, names: Vec<String>, known: bool },
    Cbind { parts: Vec<Shape>, known: bool },
    Select { frame: Box<Shape>, index: i64 },
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = (1usize..6, any::<bool>()).prop_map(|(ncols, known)| Shape::Frame { ncols, known });
    leaf.prop_recursive(5, 32, 3, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::collection::vec("[a-z]{1,3}", 1..3),
                any::<bool>()
            )
                .prop_map(|(base, names, known)| Shape::Append {
                    base: Box::new(base),
                    names,
                    known
                }),
            (prop::collection::vec(inner.clone(), 1..4), any::<bool>())
                .prop_map(|(parts, known)| Shape::Cbind { parts, known }),
            (inner, 0i64..8).prop_map(|(frame, index)| Shape::Select {
                frame: Box::new(frame),
                index
            }),
        ]
    })
}

/// Builds expression trees from shapes, registering frames in a catalog and recording the
/// column counts the shape marks as known.
#[derive(Default)]
struct TreeBuilder {
    catalog: HashMap<String, usize>,
    cache: ColumnCountCache,
}

impl TreeBuilder {
    /// Returns the node and its column count.
    fn build(&mut self, shape: &Shape) -> (ExprRef, usize) {
        let (expr, ncols, known) = match shape {
            Shape::Frame { ncols, known } => {
                let key = format!("frame{}", self.catalog.len());
                self.catalog.insert(key.clone(), *ncols);
                (ExprNode::frame(key), *ncols, *known)
            }
            Shape::Append { base, names, known } => {
                let (base, ncols) = self.build(base);
                let mut children = vec![Operand::Expr(base)];
                for (i, name) in names.iter().enumerate() {
                    children.push(format!("v{}", i).into());
                    children.push(name.as_str().into());
                }
                (
                    ExprNode::new(Operator::Append, children),
                    ncols + names.len(),
                    *known,
                )
            }
            Shape::Cbind { parts, known } => {
                let mut children = vec![];
                let mut ncols = 0;
                for part in parts {
                    let (part, part_ncols) = self.build(part);
                    children.push(Operand::Expr(part));
                    ncols += part_ncols;
                }
                (ExprNode::new(Operator::Cbind, children), ncols, *known)
            }
            Shape::Select { frame, index } => {
                let (frame, _) = self.build(frame);
                let expr = ExprNode::new(Operator::ColumnSelect, vec![frame.into(), (*index).into()]);
                (expr, 1, false)
            }
        };
        if known {
            self.cache.set_column_count(&expr, ncols);
        }
        (expr, ncols)
    }
}

fn check_equivalence(shape: &Shape, strategy: FuseStrategy) -> Result<(), TestCaseError> {
    let mut builder = TreeBuilder::default();
    let (root, _) = builder.build(shape);
    let fuser = Fuser::new(default_registry(), &builder.cache).with_strategy(strategy);

    let expected = evaluate(&root, &builder.catalog);

    let fused = fuser.fuse(root.clone());
    prop_assert_eq!(&evaluate(&fused, &builder.catalog), &expected, "fused: {}", fused);

    let optimized = fuser.optimize(root.clone());
    prop_assert_eq!(
        &evaluate(&optimized, &builder.catalog),
        &expected,
        "optimized: {}",
        optimized
    );

    // a second run has nothing left to do
    let again = fuser.optimize(optimized.clone());
    prop_assert!(ExprNode::is_same(&again, &optimized), "not a fixed point: {}", optimized);
    Ok(())
}

proptest! {
    #[test]
    fn bottom_up_optimize_preserves_evaluation(shape in arb_shape()) {
        check_equivalence(&shape, FuseStrategy::fix_point_bottomup(100))?;
    }

    #[test]
    fn top_down_optimize_preserves_evaluation(shape in arb_shape()) {
        check_equivalence(&shape, FuseStrategy::fix_point_topdown(100))?;
    }
}

#[test]
fn evaluator_sanity() {
    let mut builder = TreeBuilder::default();
    let shape = Shape::Select {
        frame: Box::new(Shape::Append {
            base: Box::new(Shape::Frame {
                ncols: 2,
                known: true,
            }),
            names: vec!["x".to_string()],
            known: false,
        }),
        index: 2,
    };
    let (root, ncols) = builder.build(&shape);
    assert_eq!(ncols, 1);
    assert_eq!(
        evaluate(&root, &builder.catalog),
        Ok(vec![r#""x"="v0""#.to_string()])
    );
}
