//! Graph compilation: definition → [`Rack`].
//!
//! # Steps
//!
//! 1. Index modules by id, rejecting duplicates and unknown kinds. Build each
//!    unit and allocate a contiguous run of zero-filled output blocks.
//! 2. Resolve every connection. Unknown module ids and unknown port names
//!    abort the load. Each connection becomes a graph edge and a fan-in entry
//!    on the destination port, pointing at the source's output block.
//! 3. Kahn's algorithm with a FIFO queue seeded in declaration order yields
//!    the acyclic prefix of the schedule.
//! 4. Units never released by step 3 sit on or behind a cycle. They are
//!    appended in declaration order.
//! 5. Edges whose endpoints share a strongly connected component (self-loops
//!    included) are feedback edges. Each reads a history copy of its source
//!    block taken at the start of the block, so it lags by exactly one block
//!    wherever the two units land in the tail. Any other edge between tail
//!    units reads the live block, which is current only when the consumer
//!    is declared after the producer.
//!
//! Nothing is allocated after this function returns.

use std::collections::{HashMap, VecDeque};

use super::definition::{GraphDef, PortRef};
use super::error::GraphError;
use super::rack::Rack;
use super::schedule::CompiledUnit;
use crate::buffer::{BufferArena, BufferId};
use crate::port::FanIn;
use crate::unit::{Unit, UnitKind};

/// A resolved connection between two module indices.
struct Edge {
    from: usize,
    to: usize,
    /// Destination input port index.
    port: usize,
    /// Position in the destination port's fan-in list.
    slot: usize,
}

/// Compiles `graph` at `sample_rate`.
///
/// # Errors
///
/// Returns [`GraphError`] on a duplicate id, an unknown kind, a connection to
/// a missing module or a connection to a port the kind does not have. Nothing
/// is built on error.
pub fn compile(graph: &GraphDef, sample_rate: f32) -> Result<Rack, GraphError> {
    // --- 1. Units and output blocks ---

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(graph.modules.len());
    let mut kinds = Vec::with_capacity(graph.modules.len());
    for (i, module) in graph.modules.iter().enumerate() {
        if index.insert(module.id.as_str(), i).is_some() {
            return Err(GraphError::DuplicateId(module.id.clone()));
        }
        let kind: UnitKind = module.kind.parse().map_err(|_| GraphError::UnknownKind {
            module: module.id.clone(),
            kind: module.kind.clone(),
        })?;
        kinds.push(kind);
    }

    let mut arena = BufferArena::new();
    let mut units: Vec<CompiledUnit> = graph
        .modules
        .iter()
        .zip(&kinds)
        .map(|(module, &kind)| {
            let outputs = arena.allocate_run(kind.output_ports().len());
            let unit = Unit::new(kind, &module.params, sample_rate);
            CompiledUnit::new(module.id.clone(), unit, module.params.clone(), outputs)
        })
        .collect();

    // --- 2. Connections ---

    let n = units.len();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    let mut edges = Vec::with_capacity(graph.connections.len());

    for connection in &graph.connections {
        let resolve = |id: &str| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| GraphError::DanglingConnection {
                    connection: connection.to_string(),
                    missing: id.to_string(),
                })
        };
        let from = resolve(connection.from.id.as_str())?;
        let to = resolve(connection.to.id.as_str())?;

        let unknown_port = |port: &PortRef| GraphError::UnknownPort {
            connection: connection.to_string(),
            port: port.to_string(),
        };
        let out_port = kinds[from]
            .output_index(&connection.from.port)
            .ok_or_else(|| unknown_port(&connection.from))?;
        let in_port = kinds[to]
            .input_index(&connection.to.port)
            .ok_or_else(|| unknown_port(&connection.to))?;

        adjacency[from].push(to);
        in_degree[to] += 1;

        let source = BufferId(units[from].outputs.0 + out_port as u32);
        let port = &mut units[to].inputs[in_port];
        edges.push(Edge {
            from,
            to,
            port: in_port,
            slot: port.sources().len(),
        });
        port.push_source(FanIn {
            buffer: source,
            source: connection.from.clone(),
            feedback: false,
        });
    }

    // --- 3. Kahn ---

    let mut order = Vec::with_capacity(n);
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    while let Some(i) = queue.pop_front() {
        order.push(i);
        for &next in &adjacency[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }
    let acyclic_len = order.len();

    // --- 4. Cyclic tail ---

    let mut placed = vec![false; n];
    for &i in &order {
        placed[i] = true;
    }
    let tail: Vec<usize> = (0..n).filter(|&i| !placed[i]).collect();
    order.extend_from_slice(&tail);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "graph_sort: {} units, {} acyclic, {} cyclic",
        n,
        acyclic_len,
        tail.len()
    );

    // --- 5. Feedback edges ---

    let mut in_tail = vec![false; n];
    for &i in &tail {
        in_tail[i] = true;
    }
    let mut reach_cache: HashMap<usize, Vec<bool>> = HashMap::new();
    let mut history_of: HashMap<BufferId, BufferId> = HashMap::new();
    let mut history = Vec::new();
    let mut feedback_edges = Vec::new();

    for (edge, connection) in edges.iter().zip(&graph.connections) {
        if !in_tail[edge.from] || !in_tail[edge.to] {
            continue;
        }
        let reach = reach_cache
            .entry(edge.to)
            .or_insert_with(|| reachable_from(edge.to, &adjacency));
        if !reach[edge.from] {
            continue;
        }

        let fan_in = &mut units[edge.to].inputs[edge.port].sources_mut()[edge.slot];
        let live = fan_in.buffer;
        let hist = *history_of.entry(live).or_insert_with(|| {
            let hist = arena.allocate();
            history.push((live, hist));
            hist
        });
        fan_in.buffer = hist;
        fan_in.feedback = true;
        feedback_edges.push(connection.clone());
    }

    #[cfg(feature = "tracing")]
    for connection in &feedback_edges {
        tracing::debug!("graph_feedback: {connection} lags one block");
    }

    // --- Sink and final layout ---

    let sink_module = kinds.iter().rposition(|kind| kind.is_sink());
    let sink = sink_module.and_then(|m| order.iter().position(|&i| i == m));

    let mut slots: Vec<Option<CompiledUnit>> = units.into_iter().map(Some).collect();
    let units: Vec<CompiledUnit> = order.iter().filter_map(|&i| slots[i].take()).collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "graph_buffers: {} blocks ({} history), sink {:?}",
        arena.len(),
        history.len(),
        sink.map(|i| units[i].id.as_str())
    );

    Ok(Rack::from_parts(
        units,
        acyclic_len,
        arena,
        history,
        feedback_edges,
        sink,
        sample_rate,
    ))
}

/// Marks every module reachable from `start` by following at least one edge.
fn reachable_from(start: usize, adjacency: &[Vec<usize>]) -> Vec<bool> {
    let mut seen = vec![false; adjacency.len()];
    let mut stack: Vec<usize> = adjacency[start].clone();
    while let Some(i) = stack.pop() {
        if !seen[i] {
            seen[i] = true;
            stack.extend_from_slice(&adjacency[i]);
        }
    }
    seen
}

impl GraphDef {
    /// Compiles this graph. See [`compile`].
    pub fn compile(&self, sample_rate: f32) -> Result<Rack, GraphError> {
        compile(self, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModuleDef;

    fn ids(rack: &Rack) -> Vec<&str> {
        rack.order().collect()
    }

    #[test]
    fn test_compile_empty_graph() {
        let rack = compile(&GraphDef::new(), 48000.0).unwrap();
        assert!(rack.is_empty());
        assert_eq!(rack.sink_id(), None);
        assert_eq!(rack.buffer_count(), 0);
    }

    #[test]
    fn test_compile_unknown_kind() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("a", "VCO"))
            .module(ModuleDef::new("fx", "REVERB"));
        assert_eq!(
            compile(&graph, 48000.0).unwrap_err(),
            GraphError::UnknownKind {
                module: "fx".into(),
                kind: "REVERB".into()
            }
        );
    }

    #[test]
    fn test_compile_dangling_connection() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("out", "OUTPUT"))
            .connect("ghost.out", "out.in");
        assert_eq!(
            compile(&graph, 48000.0).unwrap_err(),
            GraphError::DanglingConnection {
                connection: "ghost.out -> out.in".into(),
                missing: "ghost".into()
            }
        );

        let graph = GraphDef::new()
            .module(ModuleDef::new("vco", "VCO"))
            .connect("vco.out", "nowhere.in");
        assert!(matches!(
            compile(&graph, 48000.0),
            Err(GraphError::DanglingConnection { missing, .. }) if missing == "nowhere"
        ));
    }

    #[test]
    fn test_compile_unknown_port() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("vco", "VCO"))
            .module(ModuleDef::new("out", "OUTPUT"))
            .connect("vco.sine", "out.in");
        assert_eq!(
            compile(&graph, 48000.0).unwrap_err(),
            GraphError::UnknownPort {
                connection: "vco.sine -> out.in".into(),
                port: "vco.sine".into()
            }
        );

        // Output ports are not inputs.
        let graph = GraphDef::new()
            .module(ModuleDef::new("vco", "VCO"))
            .module(ModuleDef::new("vca", "VCA"))
            .connect("vco.out", "vca.out");
        assert!(matches!(
            compile(&graph, 48000.0),
            Err(GraphError::UnknownPort { port, .. }) if port == "vca.out"
        ));
    }

    #[test]
    fn test_compile_duplicate_id() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("a", "VCO"))
            .module(ModuleDef::new("a", "LFO"));
        assert_eq!(
            compile(&graph, 48000.0).unwrap_err(),
            GraphError::DuplicateId("a".into())
        );
    }

    #[test]
    fn test_compile_fifo_order() {
        // Declared out of order: out, vca, vco, lfo.
        let graph = GraphDef::new()
            .module(ModuleDef::new("out", "OUTPUT"))
            .module(ModuleDef::new("vca", "VCA"))
            .module(ModuleDef::new("vco", "VCO"))
            .module(ModuleDef::new("lfo", "LFO"))
            .connect("vco.out", "vca.in")
            .connect("lfo.out", "vca.cv")
            .connect("vca.out", "out.in");
        let rack = compile(&graph, 48000.0).unwrap();
        assert_eq!(ids(&rack), vec!["vco", "lfo", "vca", "out"]);
        assert_eq!(rack.acyclic_len(), 4);
        assert!(rack.feedback_edges().is_empty());
    }

    #[test]
    fn test_compile_unconnected_units_keep_declaration_order() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("c", "RECTIFIER"))
            .module(ModuleDef::new("a", "VCO"))
            .module(ModuleDef::new("b", "LFO"));
        let rack = compile(&graph, 48000.0).unwrap();
        assert_eq!(ids(&rack), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_compile_cycle_tail() {
        // a -> b -> c -> b, c -> out. b, c and everything behind them are cyclic.
        let graph = GraphDef::new()
            .module(ModuleDef::new("out", "OUTPUT"))
            .module(ModuleDef::new("c", "VCA"))
            .module(ModuleDef::new("b", "VCA"))
            .module(ModuleDef::new("a", "VCO"))
            .connect("a.out", "b.in")
            .connect("b.out", "c.in")
            .connect("c.out", "b.cv")
            .connect("c.out", "out.in");
        let rack = compile(&graph, 48000.0).unwrap();
        assert_eq!(rack.acyclic_len(), 1);
        assert_eq!(ids(&rack), vec!["a", "out", "c", "b"]);
        assert_eq!(rack.cyclic_ids().collect::<Vec<_>>(), vec!["out", "c", "b"]);

        let feedback: Vec<String> = rack.feedback_edges().iter().map(|c| c.to_string()).collect();
        assert_eq!(feedback, vec!["b.out -> c.in", "c.out -> b.cv"]);
    }

    #[test]
    fn test_compile_self_loop() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("osc", "VCO"))
            .connect("osc.out", "osc.fm");
        let rack = compile(&graph, 48000.0).unwrap();
        assert_eq!(rack.acyclic_len(), 0);
        assert_eq!(rack.feedback_edges().len(), 1);
        // One output block plus one history block.
        assert_eq!(rack.buffer_count(), 2);
        assert!(rack.unit("osc").unwrap().has_feedback_input());
    }

    #[test]
    fn test_compile_history_is_shared_per_source() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("a", "VCO"))
            .module(ModuleDef::new("b", "VCO"))
            .connect("a.out", "b.fm")
            .connect("a.out", "b.pitch")
            .connect("b.out", "a.fm");
        let rack = compile(&graph, 48000.0).unwrap();
        assert_eq!(rack.feedback_edges().len(), 3);
        // Two outputs, two history copies.
        assert_eq!(rack.buffer_count(), 4);
    }

    #[test]
    fn test_compile_allocates_one_block_per_output() {
        let rack = compile(&GraphDef::reference(), 48000.0).unwrap();
        // lfo, vco, vca, out: one each; pan: two.
        assert_eq!(rack.buffer_count(), 6);
        let pan = rack.unit("pan1").unwrap();
        let outputs: Vec<_> = pan.output_buffers().collect();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].1.index(), outputs[0].1.index() + 1);
        assert_eq!(pan.output_buffer("outR"), Some(outputs[1].1));
        assert_eq!(pan.output_buffer("out"), None);
    }

    #[test]
    fn test_compile_last_sink_wins() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("first", "OUTPUT"))
            .module(ModuleDef::new("vco", "VCO"))
            .module(ModuleDef::new("second", "output"));
        let rack = compile(&graph, 48000.0).unwrap();
        assert_eq!(rack.sink_id(), Some("second"));
    }

    #[test]
    fn test_compile_fan_in_records_sources() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("a", "LFO"))
            .module(ModuleDef::new("b", "LFO"))
            .module(ModuleDef::new("vca", "VCA"))
            .connect("a.out", "vca.cv")
            .connect("b.out", "vca.cv");
        let rack = compile(&graph, 48000.0).unwrap();
        let cv = rack.unit("vca").unwrap().input("cv").unwrap();
        let sources: Vec<String> = cv.sources().iter().map(|s| s.source().to_string()).collect();
        assert_eq!(sources, vec!["a.out", "b.out"]);
        assert!(!rack.unit("vca").unwrap().input("in").unwrap().is_connected());
    }
}
