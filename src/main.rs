use anyhow::{bail, Result};
use log::info;
use rapids_fusion::expr::{ExprNode, ExprRef, Operand, Operator};
use rapids_fusion::optimizer::{default_registry, FuseStrategy, Fuser};
use rapids_fusion::schema::ColumnCountCache;
use rapids_fusion::util::pretty_expr_tree;

fn append(base: ExprRef, col: &str, name: &str) -> ExprRef {
    ExprNode::new(Operator::Append, vec![base.into(), col.into(), name.into()])
}

fn select(frame: ExprRef, k: i64) -> ExprRef {
    ExprNode::new(Operator::ColumnSelect, vec![Operand::Expr(frame), k.into()])
}

fn parse_strategy(arg: Option<String>) -> Result<FuseStrategy> {
    match arg.as_deref() {
        None | Some("bottomup") => Ok(FuseStrategy::default()),
        Some("topdown") => Ok(FuseStrategy::fix_point_topdown(
            FuseStrategy::default().max_iteration,
        )),
        Some(other) => bail!("unknown match order {}, expected topdown or bottomup", other),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let strategy = parse_strategy(std::env::args().nth(1))?;

    let frame_a = ExprNode::frame("frameA");
    let mut cache = ColumnCountCache::new();
    cache.set_column_count(&frame_a, 100);

    let scenarios = vec![
        (
            "fold append chain",
            append(
                append(append(frame_a.clone(), "c1", "n1"), "c2", "n2"),
                "c3",
                "n3",
            ),
        ),
        (
            "select an original column",
            select(append(frame_a.clone(), "extra", "name"), 42),
        ),
        (
            "select the appended column",
            select(append(frame_a.clone(), "extra", "name"), 100),
        ),
    ];

    let fuser = Fuser::new(default_registry(), &cache).with_strategy(strategy);
    for (name, expr) in scenarios {
        info!("optimizing {}: {}", name, expr);
        let optimized = fuser.optimize(expr.clone());
        println!("== {}", name);
        println!("before:");
        pretty_expr_tree(&expr);
        println!("after:");
        pretty_expr_tree(&optimized);
        println!("rapids: {}", optimized);
    }
    Ok(())
}
