//! Walks an observer through the world without a renderer and prints what
//! every chunk crossing did.
//!
//! Usage: `stream_trace [steps] [seed]`. Without a seed the observer walks
//! straight along +x; with one it takes a seeded random walk.

use bevy::math::{IVec3, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use chunkstream::block::{BlockFactory, BlockHandle, SpawnError};
use chunkstream::chunk::StreamingController;
use chunkstream::world::FlatGenerator;
use chunkstream::StreamingConfig;

const STEP_LENGTH: f32 = 4.0;

struct TracedBlock {
    position: IVec3,
    active: bool,
}

impl BlockHandle for TracedBlock {
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn position(&self) -> IVec3 {
        self.position
    }
}

#[derive(Default)]
struct CountingFactory {
    spawned: usize,
}

impl BlockFactory for CountingFactory {
    type Block = TracedBlock;

    fn spawn_block(&mut self, position: IVec3) -> Result<TracedBlock, SpawnError> {
        self.spawned += 1;
        Ok(TracedBlock {
            position,
            active: true,
        })
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let steps = args
        .next()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(32);
    let seed = args.next().and_then(|value| value.parse::<u64>().ok());

    let mut controller =
        match StreamingController::<TracedBlock>::new(StreamingConfig::default(), FlatGenerator::default()) {
            Ok(controller) => controller,
            Err(err) => {
                eprintln!("Invalid streaming config: {}", err);
                std::process::exit(1);
            }
        };
    let mut factory = CountingFactory::default();
    let mut rng = seed.map(StdRng::seed_from_u64);

    let mut position = Vec3::ZERO;
    if let Err(err) = controller.initialize(position, &mut factory) {
        eprintln!("Initial generation failed: {}", err);
        std::process::exit(1);
    }
    println!(
        "Start at chunk {:?}: {} chunks, {} blocks",
        controller.previous_index(),
        controller.pool().len(),
        factory.spawned
    );

    for step in 0..steps {
        let direction = match rng.as_mut() {
            Some(rng) => Vec3::new(rng.gen_range(-1.0..=1.0), 0.0, rng.gen_range(-1.0..=1.0))
                .normalize_or_zero(),
            None => Vec3::X,
        };
        position += direction * STEP_LENGTH;

        match controller.tick(position, &mut factory) {
            Ok(Some(report)) => println!(
                "step {:>4} -> chunk {}: +{} created, {} on, {} off | {} known, {} active",
                step,
                report.current,
                report.created.len(),
                report.activated.len(),
                report.deactivated.len(),
                controller.pool().len(),
                controller.pool().active_indices().len()
            ),
            Ok(None) => {}
            Err(err) => eprintln!("step {:>4}: tick failed: {}", step, err),
        }
    }

    let inactive_blocks = controller
        .pool()
        .chunks()
        .flat_map(|chunk| chunk.blocks())
        .filter(|block| !block.is_active())
        .count();
    println!(
        "Done: {} chunks known, {} blocks spawned, {} inactive",
        controller.pool().len(),
        factory.spawned,
        inactive_blocks
    );
}
