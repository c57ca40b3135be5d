use serde::Serialize;

/// One evaluated room: corner counts and angular errors (degrees) of the
/// detected layout against ground truth, overall and for floor and ceiling.
#[derive(Serialize)]
struct Record {
    name: String,
    gt_corners: u32,
    rb_corners: u32,
    mean: f64,
    max: f64,
    min: f64,
    floor_mean: f64,
    floor_max: f64,
    floor_min: f64,
    ceiling_mean: f64,
    ceiling_max: f64,
    ceiling_min: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Mean, max and min of `n` absolute angle errors around `scale` degrees.
fn angle_errors(rng: &mut SimpleRng, n: u32, scale: f64) -> (f64, f64, f64) {
    let errors: Vec<f64> = (0..n.max(1))
        .map(|_| rng.gauss(scale, scale / 2.0).abs().min(180.0))
        .collect();
    let mean = errors.iter().sum::<f64>() / errors.len() as f64;
    let max = errors.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = errors.iter().copied().fold(f64::INFINITY, f64::min);
    (mean, max, min)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let corner_counts = [4u32, 4, 4, 4, 6, 6, 8, 10];

    let records: Vec<Record> = (0..200)
        .map(|i| {
            let gt = *rng.pick(&corner_counts);
            // Detection misses or adds a pair of corners now and then
            let rb = match rng.next_u64() % 10 {
                0 => gt.saturating_sub(2).max(4),
                1 => gt + 2,
                _ => gt,
            };
            let difficulty = if rb == gt { 1.0 } else { 3.0 };
            let (floor_mean, floor_max, floor_min) = angle_errors(&mut rng, gt, 8.0 * difficulty);
            let (ceiling_mean, ceiling_max, ceiling_min) =
                angle_errors(&mut rng, gt, 12.0 * difficulty);
            Record {
                name: format!("room_{i:04}"),
                gt_corners: gt,
                rb_corners: rb,
                mean: round2((floor_mean + ceiling_mean) / 2.0),
                max: round2(floor_max.max(ceiling_max)),
                min: round2(floor_min.min(ceiling_min)),
                floor_mean: round2(floor_mean),
                floor_max: round2(floor_max),
                floor_min: round2(floor_min),
                ceiling_mean: round2(ceiling_mean),
                ceiling_max: round2(ceiling_max),
                ceiling_min: round2(ceiling_min),
            }
        })
        .collect();

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_corners.json".to_string());
    let file = std::fs::File::create(&output_path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &records)?;

    println!("Wrote {} rooms to {output_path}", records.len());
    Ok(())
}
