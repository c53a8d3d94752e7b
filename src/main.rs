#![allow(non_snake_case)]
use GraphAnalyze::Examples::grapher_examples::grapher_examples;
use GraphAnalyze::Examples::ode_examples::ode_examples;
use GraphAnalyze::Examples::proba_examples::proba_examples;
use GraphAnalyze::Utils::logger::init_logger;
use GraphAnalyze::config::GraphAnalyzeConfig;

fn main() {
    let config = GraphAnalyzeConfig::default();
    if let Err(e) = init_logger(&config.loglevel) {
        eprintln!("{}", e);
    }
    let example = 0;
    match example {
        0 => {
            grapher_examples(0);
            grapher_examples(1);
        }
        1 => {
            grapher_examples(2);
            grapher_examples(3);
        }
        2 => {
            ode_examples(0);
        }
        3 => {
            ode_examples(1);
            ode_examples(2);
        }
        4 => {
            proba_examples(0);
        }
        5 => {
            proba_examples(1);
            proba_examples(2);
        }
        6 => {
            // configuration from a task document
            let document = "
            graph
            formula: sin(x)/x
            domain: -10, 10
            resolution: 2000
            logging
            loglevel: debug
            ";
            match GraphAnalyzeConfig::from_task_document(document) {
                Ok(config) => println!("{:?}", config),
                Err(e) => println!("{}", e),
            }
        }
        _ => {
            println!("example not found");
        }
    }
}
