use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**), so the generated file is the
/// same on every run without pulling in a rand dependency.
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

    /// Uniform value in `0..bound`.
    fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }

    /// `count` distinct indices below `bound`.
    fn distinct_indices(&mut self, count: usize, bound: u64) -> Vec<usize> {
        let mut picked = HashSet::new();
        while picked.len() < count {
            picked.insert(self.below(bound) as usize);
        }
        picked.into_iter().collect()
    }
}

const NUM_ROWS: usize = 1000;
const DUPLICATED_ROWS: usize = 15;
const MISSING_REGIONS: usize = 20;
const MISSING_PRICES: usize = 10;

const PRODUCTS: [(&str, u32); 8] = [
    ("Laptop", 1200),
    ("Smartphone", 800),
    ("Tablet", 450),
    ("Monitor", 300),
    ("Keyboard", 50),
    ("Mouse", 30),
    ("Headphones", 150),
    ("Webcam", 80),
];

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid start date");

    // Each row as ready-to-write strings, so a cell can be blanked below.
    let mut rows: Vec<Vec<String>> = (0..NUM_ROWS)
        .map(|i| {
            let customer = format!("CUST-{}", 1000 + rng.below(101));
            let (product, unit_price) = *rng.choice(&PRODUCTS);
            let quantity = 1 + rng.below(4) as u32;
            let date = start + Days::new(rng.below(365));
            let region = *rng.choice(&REGIONS);

            vec![
                (i + 1).to_string(),
                date.format("%Y-%m-%d").to_string(),
                customer,
                product.to_string(),
                quantity.to_string(),
                unit_price.to_string(),
                (quantity * unit_price).to_string(),
                region.to_string(),
            ]
        })
        .collect();

    // Blank some cells so the cleaner has something to impute.
    for idx in rng.distinct_indices(MISSING_REGIONS, NUM_ROWS as u64) {
        rows[idx][7].clear();
    }
    for idx in rng.distinct_indices(MISSING_PRICES, NUM_ROWS as u64) {
        rows[idx][5].clear();
    }

    // And re-append the first rows as exact duplicates.
    for i in 0..DUPLICATED_ROWS {
        rows.push(rows[i].clone());
    }

    let output_path = "customer_sales_data.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "Transaction_ID",
        "Date",
        "Customer_ID",
        "Product",
        "Quantity",
        "Unit_Price",
        "Total_Amount",
        "Region",
    ])?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    println!(
        "Wrote {} rows ({} duplicated, {} cells blanked) to {output_path}",
        rows.len(),
        DUPLICATED_ROWS,
        MISSING_REGIONS + MISSING_PRICES,
    );
    Ok(())
}
