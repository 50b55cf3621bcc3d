use std::sync::Arc;

use arrow::array::{Float64Array, Float64Builder, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_signals = 200;

    let mut time_created: Vec<i64> = Vec::with_capacity(n_signals);
    let mut dev_bought: Vec<f64> = Vec::with_capacity(n_signals);
    let mut dev_sold_pct: Vec<f64> = Vec::with_capacity(n_signals);
    let mut ath_market_cap: Vec<f64> = Vec::with_capacity(n_signals);
    let mut roi = Float64Builder::new();
    let mut x_multiple: Vec<f64> = Vec::with_capacity(n_signals);

    // Market caps follow a random walk in log space so the sequential
    // change column gets a mix of strong and mild moves.
    let mut log_cap = (50_000_000.0_f64).ln();
    let mut hour: i64 = 1;

    for _ in 0..n_signals {
        // A few launches share each hour bucket, like the reference data.
        if rng.next_f64() < 0.6 {
            hour += 1;
        }
        time_created.push(hour);

        dev_bought.push(rng.gauss(1.0, 0.5).abs());
        dev_sold_pct.push((rng.gauss(85.0, 20.0)).clamp(0.0, 100.0));

        log_cap += rng.gauss(0.0, 0.25);
        ath_market_cap.push(log_cap.exp());

        // Roughly one signal in seven never had its ROI recorded.
        if rng.next_f64() < 0.15 {
            roi.append_null();
        } else {
            roi.append_value(rng.gauss(12.0, 8.0).abs());
        }

        x_multiple.push(rng.gauss(6.0, 5.0).abs());
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("time_created", DataType::Int64, false),
        Field::new("dev_bought_own_token", DataType::Float64, false),
        Field::new("dev_sold_pct", DataType::Float64, false),
        Field::new("ath_market_cap", DataType::Float64, false),
        Field::new("roi", DataType::Float64, true),
        Field::new("x_multiple", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(time_created)),
            Arc::new(Float64Array::from(dev_bought)),
            Arc::new(Float64Array::from(dev_sold_pct)),
            Arc::new(Float64Array::from(ath_market_cap)),
            Arc::new(roi.finish()),
            Arc::new(Float64Array::from(x_multiple)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_signals.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_signals} signals to {output_path}");
}
