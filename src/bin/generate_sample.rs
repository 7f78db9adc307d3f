use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const HEADERS: [&str; 14] = [
    "Year",
    "Quarter",
    "Month",
    "Day",
    "Country/Region",
    "Aircraft Manufacturer",
    "Aircraft",
    "Location",
    "Operator",
    "Abroad",
    "Fatalities (air)",
    "Ground",
    "Sum of Fatalities (air)",
    "Total Fatalities",
];

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const AIRCRAFT: [(&str, &str, u32); 8] = [
    ("Douglas", "Douglas DC-3", 32),
    ("Boeing", "Boeing 747", 450),
    ("Boeing", "Boeing 737", 150),
    ("Airbus", "Airbus A320", 180),
    ("Fokker", "Fokker F27", 48),
    ("Tupolev", "Tupolev Tu-154", 164),
    ("de Havilland", "de Havilland Comet", 44),
    ("Zeppelin", "Zeppelin LZ-129", 97),
];

const PLACES: [(&str, &str); 6] = [
    ("USA", "Pan American World Airways"),
    ("Japan", "Japan Air Lines"),
    ("Russia", "Aeroflot"),
    ("Brazil", "VARIG"),
    ("United Kingdom", "British Overseas Airways"),
    ("France", "Air France"),
];

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

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One crash record with the quirks real exports have: blank categories,
/// junk numbers, the old "Feburary" spelling.
fn generate_row(rng: &mut SimpleRng) -> Vec<Option<String>> {
    let year = 1908 + rng.below(116);
    let month_idx = rng.below(12) as usize;
    let (manufacturer, aircraft, capacity) = AIRCRAFT[rng.below(AIRCRAFT.len() as u64) as usize];
    let (country, operator) = PLACES[rng.below(PLACES.len() as u64) as usize];

    let aboard = 1 + rng.below(u64::from(capacity));
    let air = rng.below(aboard + 1);
    let ground = if rng.chance(0.1) { rng.below(20) } else { 0 };

    let year_text = if rng.chance(0.01) {
        "unknown".to_string()
    } else {
        year.to_string()
    };
    let month = if month_idx == 1 && rng.chance(0.5) {
        "Feburary"
    } else {
        MONTHS[month_idx]
    };
    let blank_or = |rng: &mut SimpleRng, v: &str| (!rng.chance(0.05)).then(|| v.to_string());

    vec![
        Some(year_text),
        Some(format!("Qtr {}", month_idx / 3 + 1)),
        Some(month.to_string()),
        Some((1 + rng.below(28)).to_string()),
        blank_or(rng, country),
        blank_or(rng, manufacturer),
        Some(aircraft.to_string()),
        Some(format!("Near {country}")),
        blank_or(rng, operator),
        Some(aboard.to_string()),
        if rng.chance(0.02) { Some("?".to_string()) } else { Some(air.to_string()) },
        Some(ground.to_string()),
        Some(air.to_string()),
        Some((air + ground).to_string()),
    ]
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut rows: Vec<Vec<Option<String>>> = (0..500).map(|_| generate_row(&mut rng)).collect();

    // A few exact duplicates, as scraped exports tend to have.
    for _ in 0..12 {
        let idx = rng.below(rows.len() as u64) as usize;
        rows.push(rows[idx].clone());
    }

    // Write CSV
    let csv_path = "sample_aircrashes.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer.write_record(HEADERS).expect("Failed to write header");
    for row in &rows {
        writer
            .write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");

    // Build Arrow arrays: every column as nullable text, like a raw export
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .map(|h| Field::new(*h, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = (0..HEADERS.len())
        .map(|c| {
            let values: Vec<Option<&str>> = rows.iter().map(|r| r[c].as_deref()).collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_aircrashes.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} crash records to {csv_path} and {parquet_path}",
        rows.len()
    );
}
