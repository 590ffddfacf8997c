use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Fixed-point scale of every generated coefficient (Q14).
const FILTER_SCALE: i32 = 1 << 14;

/// Keys cubic convolution kernel with free parameter `a`.
fn keys_weight(x: f64, a: f64) -> f64 {
    let x = x.abs();
    if x <= 1.0 {
        (a + 2.0) * x * x * x - (a + 3.0) * x * x + 1.0
    } else if x < 2.0 {
        a * x * x * x - 5.0 * a * x * x + 8.0 * a * x - 4.0 * a
    } else {
        0.0
    }
}

/// Round weights to Q14 and push the rounding residue onto the heaviest tap
/// so that every phase sums to exactly `FILTER_SCALE`.
fn quantize(weights: &[f64]) -> Vec<i32> {
    let mut taps: Vec<i32> = weights
        .iter()
        .map(|w| (w * FILTER_SCALE as f64).round() as i32)
        .collect();
    let sum: i32 = taps.iter().sum();
    let heaviest = (0..taps.len()).max_by_key(|&i| taps[i]).unwrap();
    taps[heaviest] += FILTER_SCALE - sum;
    taps
}

fn bicubic_phase(t: f64, a: f64) -> Vec<i32> {
    quantize(&[
        keys_weight(1.0 + t, a),
        keys_weight(t, a),
        keys_weight(1.0 - t, a),
        keys_weight(2.0 - t, a),
    ])
}

fn bilinear_phase(t: f64) -> Vec<i32> {
    quantize(&[1.0 - t, t])
}

fn write_table(
    file: &mut File,
    doc: &str,
    name: &str,
    phases: usize,
    taps: usize,
    phase_fn: impl Fn(f64) -> Vec<i32>,
) {
    writeln!(file, "/// {doc}").unwrap();
    writeln!(
        file,
        "/// Layout: {phases} phases x {taps} taps, Q14, each phase sums to 16384."
    )
    .unwrap();
    writeln!(file, "pub static {name}: [i16; {}] = [", phases * taps).unwrap();
    for phase in 0..phases {
        let t = phase as f64 / phases as f64;
        let coeffs = phase_fn(t);
        write!(file, "   ").unwrap();
        for c in coeffs {
            write!(file, " {c},").unwrap();
        }
        writeln!(file).unwrap();
    }
    writeln!(file, "];\n").unwrap();
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("filter_tables.rs");
    let mut file = File::create(&dest_path).unwrap();

    // 8 fractional filter bits for 8-bit samples, 9 for 16-bit samples
    for (suffix, phases) in [("U8", 256usize), ("S16", 512usize)] {
        write_table(
            &mut file,
            "Bicubic (a = -0.5) coefficients",
            &format!("BICUBIC_{suffix}"),
            phases,
            4,
            |t| bicubic_phase(t, -0.5),
        );
        write_table(
            &mut file,
            "Sharp bicubic (a = -1.0) coefficients",
            &format!("BICUBIC2_{suffix}"),
            phases,
            4,
            |t| bicubic_phase(t, -1.0),
        );
        write_table(
            &mut file,
            "Bilinear coefficients",
            &format!("BILINEAR_{suffix}"),
            phases,
            2,
            bilinear_phase,
        );
    }

    println!("cargo::rerun-if-changed=build.rs");
}
