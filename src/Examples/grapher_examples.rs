#![allow(non_snake_case)]

use crate::config::GraphAnalyzeConfig;
use crate::graph::grapher_module::GrapherModule;
use crate::graph::graph_info::PlotRect;
use crate::graph::modules::{PointerEvent, Workspace, ModuleId, Module};
use crate::numerical::integration::{integrate, integrate_sorted};
use crate::numerical::sampler::{sample, sample_par};
use crate::numerical::tangent::tangent_at_x;
use crate::symbolic::expression::Expression;
use crate::symbolic::symbolic_engine::Expr;
use log::info;

#[allow(dead_code)]
pub fn grapher_examples(example: usize) {
    match example {
        0 => {
            // parse, compile and evaluate a formula
            let input = "x^2 + x + 1";
            let parsed_expression = Expr::parse_expression(input).unwrap();
            println!(" parsed_expression {}", parsed_expression);
            println!(" variables {:?}", parsed_expression.extract_variables());
            let mut f = Expression::new("x");
            f.set_text(input);
            f.commit().unwrap();
            println!("f(0) = {}, f(1) = {}", f.evaluate_at(0.0).unwrap(), f.evaluate_at(1.0).unwrap());
            // an invalid edit keeps the last good formula
            f.set_text("x^2 + ");
            let result = f.commit();
            println!("commit of '{}': {:?}", f.text(), result);
            println!("still evaluating '{:?}': f(2) = {}", f.compiled_text(), f.evaluate_at(2.0).unwrap());
        }
        1 => {
            // sampling, tangent and integral on the same samples
            let f = Expression::from_formula("sin(x) * exp(-x^2 / 4)").unwrap();
            let samples = sample(&f, -3.0, 3.0, 5000).unwrap();
            let samples_par = sample_par(&f, -3.0, 3.0, 5000).unwrap();
            assert_eq!(samples, samples_par);
            let tangent = tangent_at_x(&samples, 0.0).unwrap();
            println!("tangent at 0: slope {}, segment {:?}", tangent.slope, tangent.segment(1.0));
            let area = integrate(&samples, 0.0, 3.0).unwrap();
            let area_sorted = integrate_sorted(&samples, 3.0, 0.0).unwrap();
            println!("integral from 0 to 3 = {}, from 3 to 0 = {}", area, area_sorted);
        }
        2 => {
            // grapher module driven by pointer events: zoom, then integrate over a selection
            let mut grapher = GrapherModule::from_config(&GraphAnalyzeConfig::default());
            grapher.set_plot_rect(PlotRect::new(0.0, 0.0, 630.0, 400.0)).unwrap();
            grapher.handle_pointer(PointerEvent::Pressed { x: 0.0, y: 200.0 });
            grapher.handle_pointer(PointerEvent::Moved { x: 200.0, y: 200.0 });
            grapher.handle_pointer(PointerEvent::Released { x: 315.0, y: 200.0 });
            info!("domain after zoom {:?}", grapher.domain());
            let graph = grapher.graph().unwrap();
            println!("x ticks {:?}", graph.tick_values(5));
            println!("y ticks {:?}", graph.tick_values_y(5));
            grapher.open_integration();
            grapher.handle_pointer(PointerEvent::Pressed { x: 629.0, y: 200.0 });
            grapher.handle_pointer(PointerEvent::Released { x: 0.0, y: 200.0 });
            println!(
                "selection {:?}, integral {}",
                grapher.integration().selection(),
                grapher.integration_result().unwrap()
            );
        }
        3 => {
            // every module of the workspace
            let mut workspace = Workspace::new(GraphAnalyzeConfig::default());
            if let Module::Grapher(grapher) = workspace.open(ModuleId::Grapher) {
                grapher.set_formula("1/x").unwrap();
                println!("undefined samples: {}", grapher.samples().gaps());
                let lines = grapher.graph().unwrap().polylines(grapher.samples());
                println!("polylines: {}", lines.len());
            }
            let owner = workspace.handle_pointer(PointerEvent::Pressed { x: 5.0, y: 5.0 });
            println!("input owner {:?}", owner);
        }
        _ => {
            println!("example not found");
        }
    }
}
