use nnet::architecture::load_network;
use nnet::layers::{LayerRole, Source};
use nnet::network::{LayerId, Network, SourceId};
use nnet::utils::dump::{format_matrix, format_vector};
use nnet::utils::SimpleRng;
use std::fmt::Write;
use std::process;

// Canonical 2-2-1 walkthrough values.
const INPUT: [f64; 2] = [0.35, 0.9];
const TARGET: [f64; 1] = [0.5];
const HIDDEN_WEIGHTS: [[f64; 2]; 2] = [[0.1, 0.8], [0.4, 0.6]];
const OUTPUT_WEIGHTS: [[f64; 2]; 1] = [[0.3, 0.9]];

// Wire input -> hidden(2) -> output(1) by hand and pin the weights.
fn canonical_network() -> nnet::Result<Network> {
    let mut rng = SimpleRng::from_time();
    let mut network = Network::new(INPUT.len());

    let hidden = network.add_hidden_layer(2);
    let output = network.add_output_layer(1);
    network.set_source(hidden, SourceId::Input, &mut rng)?;
    network.set_sink(hidden, output)?;
    network.set_weights(hidden, &HIDDEN_WEIGHTS)?;

    network.set_source(output, hidden.into(), &mut rng)?;
    network.set_weights(output, &OUTPUT_WEIGHTS)?;
    Ok(network)
}

// Use the config file named by the first argument, if any.
fn network_from_args(args: &[String]) -> nnet::Result<Network> {
    match args.get(1) {
        Some(path) => load_network(path),
        None => canonical_network(),
    }
}

fn weights_of(network: &Network, id: LayerId) -> nnet::Result<String> {
    let layer = network.layer(id)?;
    Ok(layer.weight().map(format_matrix).unwrap_or_default())
}

// One feedforward/backpropagate step, recording every intermediate value.
fn run_step(network: &mut Network, input: &[f64], target: &[f64]) -> nnet::Result<String> {
    let mut out = String::new();
    let order = network.chain_order()?;

    network.set_input(input)?;
    let _ = write!(out, "Input Layer: \n{}", format_vector(&network.input().output()));

    for &id in &order {
        network.feedforward(id)?;
        let _ = write!(out, "Layer {} Weights: \n{}", id, weights_of(network, id)?);
        let _ = write!(
            out,
            "Layer {} Output: \n{}",
            id,
            format_vector(&network.layer(id)?.output())
        );
    }

    for &id in order.iter().rev() {
        match network.layer(id)?.role() {
            LayerRole::Output => network.backpropagate_output(id, target)?,
            LayerRole::Hidden { .. } => network.backpropagate_hidden(id)?,
        }
        let _ = write!(
            out,
            "Layer {} Error: \n{}",
            id,
            format_vector(network.layer(id)?.error())
        );
        let _ = write!(out, "Layer {} Weights After Update: \n{}", id, weights_of(network, id)?);
    }

    Ok(out)
}

fn run(args: &[String]) -> nnet::Result<String> {
    let mut network = network_from_args(args)?;
    run_step(&mut network, &INPUT, &TARGET)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(transcript) => print!("{}", transcript),
        Err(err) => {
            eprintln!("chain_demo: {}", err);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_args_without_config() {
        let args = vec!["chain_demo".to_string()];
        let network = network_from_args(&args).unwrap();
        assert_eq!(network.layers().len(), 2);
        assert_eq!(
            network.layers()[0].weight().unwrap().to_rows(),
            vec![vec![0.1, 0.8], vec![0.4, 0.6]]
        );
    }

    #[test]
    fn test_run_step_transcript() {
        let mut network = canonical_network().unwrap();
        let transcript = run_step(&mut network, &INPUT, &TARGET).unwrap();
        assert!(transcript.starts_with("Input Layer: \n0.35000\n0.90000\n\n"));
        assert!(transcript.contains("Layer #0 Output: \n0.68027\n0.66374\n\n"));
        assert!(transcript.contains("Layer #1 Output: \n0.69028\n\n"));
        assert!(transcript.contains("Layer #1 Error: \n-0.04068\n\n"));
        assert!(transcript.contains("Layer #1 Weights After Update: \n0.27233\t0.87300\t\n\n"));
    }
}
