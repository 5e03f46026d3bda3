//! Block scheduler and output mixer.
//!
//! A [`Rack`] is the executable form of a graph: units in schedule order, the
//! buffer arena, feedback history pairs and the sink. One call to
//! [`process_block`](Rack::process_block) runs every unit once and mixes the
//! sink to stereo through the soft limiter.

use super::definition::Connection;
use super::schedule::CompiledUnit;
use crate::buffer::{BLOCK_SIZE, Block, BufferArena, BufferId};
use crate::math::soft_limit;

/// A compiled, runnable graph.
#[derive(Debug)]
pub struct Rack {
    units: Vec<CompiledUnit>,
    acyclic_len: usize,
    arena: BufferArena,
    /// `(live, history)` pairs copied at the start of every block.
    history: Vec<(BufferId, BufferId)>,
    feedback_edges: Vec<Connection>,
    /// Index into `units`.
    sink: Option<usize>,
    sample_rate: f32,
}

impl Rack {
    pub(crate) fn from_parts(
        units: Vec<CompiledUnit>,
        acyclic_len: usize,
        arena: BufferArena,
        history: Vec<(BufferId, BufferId)>,
        feedback_edges: Vec<Connection>,
        sink: Option<usize>,
        sample_rate: f32,
    ) -> Self {
        Self {
            units,
            acyclic_len,
            arena,
            history,
            feedback_edges,
            sink,
            sample_rate,
        }
    }

    /// Runs one block and writes the limited stereo result.
    ///
    /// Up to [`BLOCK_SIZE`] samples are written to each channel; anything
    /// beyond that is zeroed. Without a sink both channels are silent.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.run();
        self.mix(left, right);
    }

    /// Runs every unit once without mixing.
    pub fn run(&mut self) {
        for &(live, hist) in &self.history {
            self.arena.copy(live, hist);
        }

        let sample_rate = self.sample_rate;
        for unit in &mut self.units {
            for port in &mut unit.inputs {
                port.gather(&self.arena);
            }
            let outputs = self.arena.run_mut(unit.first_output(), unit.output_count());
            unit.unit.process(&unit.inputs, outputs, sample_rate);
        }
    }

    /// Mixes the sink of the last [`run`](Self::run) into `left`/`right`.
    ///
    /// Connected stereo inputs win; a lone side feeds both channels. With no
    /// stereo input the sink's mono output goes to both channels.
    pub fn mix(&self, left: &mut [f32], right: &mut [f32]) {
        let Some((l_src, r_src)) = self.sink_sources() else {
            left.fill(0.0);
            right.fill(0.0);
            return;
        };
        write_limited(l_src, left);
        write_limited(r_src, right);
    }

    fn sink_sources(&self) -> Option<(&Block, &Block)> {
        let sink = &self.units[self.sink?];
        let [_, in_l, in_r] = sink.inputs.as_slice() else {
            return None;
        };
        let mono = self.arena.get(sink.first_output());
        Some(match (in_l.is_connected(), in_r.is_connected()) {
            (true, true) => (in_l.block(), in_r.block()),
            (true, false) => (in_l.block(), in_l.block()),
            (false, true) => (in_r.block(), in_r.block()),
            (false, false) => (mono, mono),
        })
    }

    /// Sample rate the rack was compiled for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if the rack has no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units in execution order.
    pub fn units(&self) -> &[CompiledUnit] {
        &self.units
    }

    /// Looks up a unit by module id.
    pub fn unit(&self, id: &str) -> Option<&CompiledUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Module ids in execution order.
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.units.iter().map(|u| u.id.as_str())
    }

    /// Length of the topologically sorted prefix.
    pub fn acyclic_len(&self) -> usize {
        self.acyclic_len
    }

    /// Ids of the units appended after the sorted prefix.
    pub fn cyclic_ids(&self) -> impl Iterator<Item = &str> {
        self.units[self.acyclic_len..].iter().map(|u| u.id.as_str())
    }

    /// Connections that read one block late because they close a cycle.
    pub fn feedback_edges(&self) -> &[Connection] {
        &self.feedback_edges
    }

    /// Total number of arena blocks, history copies included.
    pub fn buffer_count(&self) -> usize {
        self.arena.len()
    }

    /// Id of the sink unit, if any.
    pub fn sink_id(&self) -> Option<&str> {
        self.sink.map(|i| self.units[i].id.as_str())
    }

    /// Output block of `id.port` as of the last run.
    pub fn output(&self, id: &str, port: &str) -> Option<&Block> {
        let buffer = self.unit(id)?.output_buffer(port)?;
        Some(self.arena.get(buffer))
    }

    /// Aggregated input block of `id.port` as of the last run.
    pub fn input(&self, id: &str, port: &str) -> Option<&Block> {
        Some(self.unit(id)?.input(port)?.block())
    }

    /// First output block of every unit, in execution order.
    pub fn probes(&self) -> impl Iterator<Item = (&str, &Block)> {
        self.units
            .iter()
            .map(|u| (u.id(), self.arena.get(u.first_output())))
    }
}

fn write_limited(src: &Block, dst: &mut [f32]) {
    let n = dst.len().min(BLOCK_SIZE);
    for (d, &s) in dst[..n].iter_mut().zip(src.iter()) {
        *d = soft_limit(s);
    }
    dst[n..].fill(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SILENCE;
    use crate::graph::{GraphDef, ModuleDef, compile};

    fn stereo(rack: &mut Rack) -> (Block, Block) {
        let mut left = SILENCE;
        let mut right = SILENCE;
        rack.process_block(&mut left, &mut right);
        (left, right)
    }

    /// Square LFO at its floor rate: holds -5 V for the first half-cycle.
    fn minus_five(id: &str) -> ModuleDef {
        ModuleDef::new(id, "LFO")
            .with_param("shape", "square")
            .with_param("freq", -100.0f32)
    }

    #[test]
    fn test_process_without_sink_is_silent() {
        let graph = GraphDef::new().module(ModuleDef::new("vco", "VCO"));
        let mut rack = compile(&graph, 48000.0).unwrap();
        let mut left = [1.0; BLOCK_SIZE];
        let mut right = [1.0; BLOCK_SIZE];
        rack.process_block(&mut left, &mut right);
        assert_eq!(left, SILENCE);
        assert_eq!(right, SILENCE);
    }

    #[test]
    fn test_process_unpatched_sink_is_silent() {
        let graph = GraphDef::new().module(ModuleDef::new("out", "OUTPUT"));
        let mut rack = compile(&graph, 48000.0).unwrap();
        let (l, r) = stereo(&mut rack);
        assert_eq!(l, SILENCE);
        assert_eq!(r, SILENCE);
    }

    #[test]
    fn test_process_mono_feeds_both_channels() {
        let graph = GraphDef::new()
            .module(minus_five("lfo"))
            .module(ModuleDef::new("rect", "RECTIFIER"))
            .module(ModuleDef::new("out", "OUTPUT"))
            .connect("lfo.out", "rect.in")
            .connect("rect.out", "out.in");
        let mut rack = compile(&graph, 48000.0).unwrap();
        let (l, r) = stereo(&mut rack);
        let expected = soft_limit(5.0);
        assert!(l.iter().all(|&s| s == expected));
        assert_eq!(l, r);
    }

    #[test]
    fn test_process_single_stereo_side_feeds_both() {
        let graph = GraphDef::new()
            .module(minus_five("lfo"))
            .module(ModuleDef::new("out", "OUTPUT"))
            .connect("lfo.out", "out.inR");
        let mut rack = compile(&graph, 48000.0).unwrap();
        let (l, r) = stereo(&mut rack);
        assert!(r.iter().all(|&s| s == soft_limit(-5.0)));
        assert_eq!(l, r);
    }

    #[test]
    fn test_process_stereo_overrides_mono() {
        let graph = GraphDef::new()
            .module(minus_five("neg"))
            .module(ModuleDef::new("rect", "RECTIFIER"))
            .module(ModuleDef::new("out", "OUTPUT"))
            .connect("neg.out", "rect.in")
            .connect("neg.out", "out.in")
            .connect("neg.out", "out.inL")
            .connect("rect.out", "out.inR");
        let mut rack = compile(&graph, 48000.0).unwrap();
        let (l, r) = stereo(&mut rack);
        assert!(l.iter().all(|&s| s == soft_limit(-5.0)));
        assert!(r.iter().all(|&s| s == soft_limit(5.0)));
    }

    #[test]
    fn test_process_reference_patch_is_limited() {
        let mut rack = compile(&GraphDef::reference(), 48000.0).unwrap();
        let mut peak = 0.0f32;
        for _ in 0..200 {
            let (l, r) = stereo(&mut rack);
            for s in l.iter().chain(r.iter()) {
                assert!(*s > -1.0 && *s < 1.0);
                peak = peak.max(s.abs());
            }
        }
        assert!(peak > 0.1, "reference patch is audible");
    }

    #[test]
    fn test_process_short_and_long_host_buffers() {
        let graph = GraphDef::new()
            .module(minus_five("lfo"))
            .module(ModuleDef::new("out", "OUTPUT"))
            .connect("lfo.out", "out.in");
        let mut rack = compile(&graph, 48000.0).unwrap();

        let mut left = [9.0; 16];
        let mut right = [9.0; 16];
        rack.process_block(&mut left, &mut right);
        assert!(left.iter().all(|&s| s == soft_limit(-5.0)));

        let mut left = vec![9.0; BLOCK_SIZE + 8];
        let mut right = vec![9.0; BLOCK_SIZE + 8];
        rack.process_block(&mut left, &mut right);
        assert!(left[..BLOCK_SIZE].iter().all(|&s| s == soft_limit(-5.0)));
        assert!(left[BLOCK_SIZE..].iter().all(|&s| s == 0.0));
        assert!(right[BLOCK_SIZE..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_process_acyclic_reads_current_block() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("vca", "VCA"))
            .module(ModuleDef::new("vco", "VCO"))
            .connect("vco.out", "vca.in");
        let mut rack = compile(&graph, 48000.0).unwrap();
        rack.run();
        assert_eq!(rack.input("vca", "in"), rack.output("vco", "out"));
    }

    #[test]
    fn test_process_feedback_lags_one_block() {
        // a -> b -> a; both cyclic. b reads a's previous block and vice versa.
        let graph = GraphDef::new()
            .module(ModuleDef::new("a", "RECTIFIER"))
            .module(ModuleDef::new("b", "RECTIFIER"))
            .module(ModuleDef::new("vco", "VCO"))
            .connect("vco.out", "a.in")
            .connect("a.out", "b.in")
            .connect("b.out", "a.in");
        let mut rack = compile(&graph, 48000.0).unwrap();
        assert_eq!(rack.feedback_edges().len(), 2);

        rack.run();
        let a_first = *rack.output("a", "out").unwrap();
        assert_eq!(rack.input("b", "in"), Some(&SILENCE));

        rack.run();
        assert_eq!(rack.input("b", "in"), Some(&a_first));
    }

    #[test]
    fn test_process_tail_consumer_declared_before_cycle_reads_previous_block() {
        // out sits behind the a <-> b cycle but is declared first, so it runs
        // before b in the tail and sees b's output from the previous block.
        let graph = GraphDef::new()
            .module(ModuleDef::new("vco", "VCO"))
            .module(ModuleDef::new("out", "OUTPUT"))
            .module(ModuleDef::new("a", "RECTIFIER"))
            .module(ModuleDef::new("b", "RECTIFIER"))
            .connect("vco.out", "a.in")
            .connect("a.out", "b.in")
            .connect("b.out", "a.in")
            .connect("b.out", "out.in");
        let mut rack = compile(&graph, 48000.0).unwrap();
        assert_eq!(rack.order().collect::<Vec<_>>(), vec!["vco", "out", "a", "b"]);
        let feedback: Vec<String> = rack.feedback_edges().iter().map(|c| c.to_string()).collect();
        assert_eq!(feedback, vec!["a.out -> b.in", "b.out -> a.in"]);
        assert!(!rack.unit("out").unwrap().has_feedback_input());

        rack.run();
        rack.run();
        let b_second = *rack.output("b", "out").unwrap();
        assert_ne!(b_second, SILENCE);
        rack.run();
        assert_eq!(rack.input("out", "in"), Some(&b_second));
        assert_ne!(rack.input("out", "in"), rack.output("b", "out"));
    }

    #[test]
    fn test_process_stacking_sums() {
        let graph = GraphDef::new()
            .module(ModuleDef::new("x", "VCO").with_param("freq", 2.0f32))
            .module(ModuleDef::new("y", "LFO").with_param("freq", 1.0f32))
            .module(ModuleDef::new("r", "RECTIFIER"))
            .connect("x.out", "r.in")
            .connect("y.out", "r.in");
        let mut rack = compile(&graph, 48000.0).unwrap();
        rack.run();
        let x = rack.output("x", "out").unwrap();
        let y = rack.output("y", "out").unwrap();
        let sum = rack.input("r", "in").unwrap();
        for i in 0..BLOCK_SIZE {
            assert_eq!(sum[i], x[i] + y[i]);
        }
    }

    #[test]
    fn test_probes_follow_execution_order() {
        let mut rack = compile(&GraphDef::reference(), 48000.0).unwrap();
        rack.run();
        let ids: Vec<&str> = rack.probes().map(|(id, _)| id).collect();
        assert_eq!(ids, rack.order().collect::<Vec<_>>());
    }
}
