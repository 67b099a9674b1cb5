use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One output row, in the column order of the usual tourism export.
#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Visitors")]
    visitors: i64,
    #[serde(rename = "Rating")]
    rating: f64,
    #[serde(rename = "Revenue")]
    revenue: f64,
    #[serde(rename = "Accommodation_Available")]
    accommodation_available: &'static str,
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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // (country, locations, preferred categories)
    let countries: [(&str, &[&str], &[&str]); 5] = [
        ("France", &["Paris", "Nice", "Lyon"], &["Cultural", "Beach", "Urban", "Historical"]),
        ("Japan", &["Kyoto", "Osaka"], &["Cultural", "Urban"]),
        ("Brazil", &["Rio", "Salvador", "Manaus"], &["Beach", "Nature", "Adventure"]),
        ("Egypt", &["Cairo", "Luxor"], &["Historical"]),
        (
            "United States",
            &["Miami", "Denver", "New York"],
            &["Beach", "Adventure", "Urban", "Nature"],
        ),
    ];

    let rows_per_country = 40;
    let mut rows = Vec::with_capacity(countries.len() * rows_per_country);

    for (country, locations, categories) in &countries {
        for _ in 0..rows_per_country {
            let visitors = rng.range(1_000.0, 1_000_000.0).round() as i64;
            let revenue_per_visitor = rng.range(50.0, 1_500.0);
            rows.push(SampleRow {
                location: rng.pick(locations).to_string(),
                country: country.to_string(),
                category: rng.pick(categories).to_string(),
                visitors,
                rating: (rng.range(1.0, 5.0) * 100.0).round() / 100.0,
                revenue: (visitors as f64 * revenue_per_visitor * 100.0).round() / 100.0,
                accommodation_available: if rng.next_f64() < 0.6 { "Yes" } else { "No" },
            });
        }
    }

    // Write CSV
    let csv_path = "tourism_sample.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    for row in &rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;

    // Build Arrow arrays
    let schema = Arc::new(Schema::new(vec![
        Field::new("Location", DataType::Utf8, false),
        Field::new("Country", DataType::Utf8, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Visitors", DataType::Int64, false),
        Field::new("Rating", DataType::Float64, false),
        Field::new("Revenue", DataType::Float64, false),
        Field::new("Accommodation_Available", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.location.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.category.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.visitors))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.rating))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.revenue))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.accommodation_available),
            )),
        ],
    )
    .context("building record batch")?;

    // Write Parquet
    let parquet_path = "tourism_sample.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!(
        "Wrote {} rows for {} countries to {csv_path} and {parquet_path}",
        rows.len(),
        countries.len()
    );
    Ok(())
}
