mod obj;
mod provenance;
mod skeleton_file;

use anyhow::{Context, Result};
use autorig::api::{
    try_autorig, RigCfg, SearchCfg, SearchMode, Skeleton, DEFAULT_MAX_SPHERES, DEFAULT_TREE_TOL,
};
use autorig::Vec3;
use clap::{Args, Parser, Subcommand};
use polars::prelude::*;
use serde_json::json;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::provenance::Payload;
use crate::skeleton_file::SkeletonFile;

#[derive(Parser)]
#[command(name = "autorig-cli")]
#[command(about = "Embed an articulated skeleton into a closed triangle mesh")]
struct Cmd {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log: Level,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Rig one mesh and write the joint table (CSV, or Parquet by extension)
    Rig(RigArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Debug)]
struct RigArgs {
    /// Wavefront OBJ mesh (v/f records)
    #[arg(long)]
    mesh: PathBuf,
    /// JSON skeleton description
    #[arg(long)]
    skeleton: PathBuf,
    #[arg(long)]
    out: PathBuf,
    /// Distance-field tolerance in unit-cube coordinates
    #[arg(long, default_value_t = DEFAULT_TREE_TOL, value_parser = positive_tol)]
    tol: f64,
    /// Medial sampling step (defaults to --tol)
    #[arg(long, value_parser = positive_tol)]
    medial_tol: Option<f64>,
    #[arg(long, default_value_t = DEFAULT_MAX_SPHERES)]
    max_spheres: usize,
    /// Keep octree cells that lie entirely outside the mesh
    #[arg(long)]
    no_crop: bool,
    /// Race worker threads on one frontier instead of the sequential search
    #[arg(long)]
    concurrent: bool,
    /// Worker count for --concurrent (defaults to available cores)
    #[arg(long)]
    threads: Option<usize>,
}

fn positive_tol(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{s:?}: {e}"))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(format!("{s} is not a finite positive tolerance"))
    }
}

impl RigArgs {
    fn cfg(&self) -> RigCfg {
        let mode = if self.concurrent {
            SearchMode::Concurrent {
                threads: self.threads,
            }
        } else {
            SearchMode::Sequential
        };
        RigCfg {
            tree_tol: self.tol,
            medial_tol: self.medial_tol.unwrap_or(self.tol),
            max_spheres: self.max_spheres,
            crop_outside: !self.no_crop,
            search: SearchCfg {
                mode,
                ..SearchCfg::default()
            },
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(cmd.log)
        .init();
    match cmd.action {
        Action::Rig(args) => rig(&args),
        Action::Report => report(),
    }
}

fn rig(args: &RigArgs) -> Result<()> {
    tracing::info!(mesh = %args.mesh.display(), skeleton = %args.skeleton.display(), "rig");
    let mesh = obj::load_obj(&args.mesh)?;
    let skeleton = SkeletonFile::load(&args.skeleton)?
        .build()
        .with_context(|| format!("building skeleton from {}", args.skeleton.display()))?;
    let cfg = args.cfg();

    // An unrigged mesh still yields a (header-only) table.
    let (positions, penalty) = match try_autorig(&skeleton, &mesh, &cfg) {
        Ok(out) => (out.world_embedding(), Some(out.penalty)),
        Err(e) => {
            tracing::warn!(error = %e, "no embedding");
            (Vec::new(), None)
        }
    };

    let mut df = embedding_frame(&skeleton, &positions)?;
    write_frame(&mut df, &args.out)?;
    tracing::info!(rows = df.height(), out = %args.out.display(), "wrote joint table");

    let payload = Payload::new(json!({
        "tree_tol": cfg.tree_tol,
        "medial_tol": cfg.medial_tol,
        "max_spheres": cfg.max_spheres,
        "crop_outside": cfg.crop_outside,
        "search_mode": format!("{:?}", cfg.search.mode),
        "penalty": penalty,
    }))
    .with_input(&args.mesh)
    .with_input(&args.skeleton);
    provenance::write_sidecar(&args.out, payload)?;
    Ok(())
}

/// One row per full joint: name and position in mesh coordinates.
fn embedding_frame(skeleton: &Skeleton, positions: &[Vec3<f64>]) -> PolarsResult<DataFrame> {
    let names: Vec<&str> = (0..positions.len()).map(|i| skeleton.joint_name(i)).collect();
    let xs: Vec<f64> = positions.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = positions.iter().map(|p| p.y).collect();
    let zs: Vec<f64> = positions.iter().map(|p| p.z).collect();
    df!("joint" => names, "x" => xs, "y" => ys, "z" => zs)
}

fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    match out.extension().and_then(|e| e.to_str()) {
        Some("parquet") => {
            ParquetWriter::new(file).finish(df)?;
        }
        _ => {
            CsvWriter::new(file).include_header(true).finish(df)?;
        }
    }
    Ok(())
}

fn report() -> Result<()> {
    let defaults = RigCfg::default();
    let obj = provenance::block(json!({
        "tree_tol": defaults.tree_tol,
        "medial_tol": defaults.medial_tol,
        "max_spheres": defaults.max_spheres,
        "crop_outside": defaults.crop_outside,
    }));
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autorig::api::SkeletonBuilder;
    use tempfile::tempdir;

    fn two_joint() -> Skeleton {
        let mut b = SkeletonBuilder::new();
        b.make_joint("root", Vec3::new(0.5, 0.3, 0.5), None).unwrap();
        b.make_joint("tip", Vec3::new(0.5, 0.7, 0.5), Some("root")).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn flags_map_onto_rig_cfg() {
        let cmd = Cmd::try_parse_from([
            "autorig-cli",
            "--log",
            "debug",
            "rig",
            "--mesh",
            "m.obj",
            "--skeleton",
            "s.json",
            "--out",
            "o.csv",
            "--tol",
            "0.01",
            "--no-crop",
            "--concurrent",
            "--threads",
            "3",
        ])
        .unwrap();
        assert_eq!(cmd.log, Level::DEBUG);
        let Action::Rig(args) = cmd.action else {
            panic!("expected rig");
        };
        let cfg = args.cfg();
        assert_eq!(cfg.tree_tol, 0.01);
        assert_eq!(cfg.medial_tol, 0.01);
        assert_eq!(cfg.max_spheres, DEFAULT_MAX_SPHERES);
        assert!(!cfg.crop_outside);
        assert_eq!(cfg.search.mode, SearchMode::Concurrent { threads: Some(3) });
    }

    #[test]
    fn defaults_are_sequential_and_cropped() {
        let cmd = Cmd::try_parse_from([
            "autorig-cli", "rig", "--mesh", "m.obj", "--skeleton", "s.json", "--out", "o.csv",
        ])
        .unwrap();
        let Action::Rig(args) = cmd.action else {
            panic!("expected rig");
        };
        let cfg = args.cfg();
        assert_eq!(cfg.tree_tol, DEFAULT_TREE_TOL);
        assert!(cfg.crop_outside);
        assert_eq!(cfg.search.mode, SearchMode::Sequential);
    }

    #[test]
    fn tolerances_must_be_positive() {
        let base = [
            "autorig-cli", "rig", "--mesh", "m.obj", "--skeleton", "s.json", "--out", "o.csv",
        ];
        for (flag, value) in [
            ("--tol", "0"),
            ("--tol", "-0.01"),
            ("--tol", "nan"),
            ("--medial-tol", "0"),
            ("--medial-tol", "inf"),
            ("--medial-tol", "abc"),
        ] {
            let mut argv = base.to_vec();
            argv.extend([flag, value]);
            assert!(Cmd::try_parse_from(argv).is_err(), "{flag} {value} accepted");
        }
        let mut argv = base.to_vec();
        argv.extend(["--medial-tol", "0.02"]);
        let Action::Rig(args) = Cmd::try_parse_from(argv).unwrap().action else {
            panic!("expected rig");
        };
        assert_eq!(args.cfg().medial_tol, 0.02);
    }

    #[test]
    fn joint_table_roundtrips_through_csv() {
        let sk = two_joint();
        let positions = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 4.0, 3.0)];
        let mut df = embedding_frame(&sk, &positions).unwrap();
        assert_eq!(df.shape(), (2, 4));

        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("rig.csv");
        write_frame(&mut df, &out).unwrap();
        let back = LazyCsvReader::new(&out).finish().unwrap().collect().unwrap();
        assert_eq!(back.shape(), (2, 4));
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("joint,x,y,z"));
        assert!(text.contains("tip"));
    }

    #[test]
    fn failed_rig_writes_header_only() {
        let sk = two_joint();
        let mut df = embedding_frame(&sk, &[]).unwrap();
        assert_eq!(df.height(), 0);
        let dir = tempdir().unwrap();
        let out = dir.path().join("empty.csv");
        write_frame(&mut df, &out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn rig_rejects_a_disconnected_mesh_with_an_empty_table() {
        let dir = tempdir().unwrap();
        let mesh = dir.path().join("two.obj");
        // Two separate triangles.
        fs::write(
            &mesh,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 5 5 5\nv 6 5 5\nv 5 6 5\nf 1 2 3\nf 4 5 6\n",
        )
        .unwrap();
        let skel = dir.path().join("s.json");
        fs::write(
            &skel,
            r#"{"joints": [{"name": "root", "pos": [0.5, 0.3, 0.5]},
                          {"name": "tip", "pos": [0.5, 0.7, 0.5], "parent": "root"}]}"#,
        )
        .unwrap();
        let out = dir.path().join("rig.csv");
        let args = RigArgs {
            mesh,
            skeleton: skel,
            out: out.clone(),
            tol: 0.01,
            medial_tol: None,
            max_spheres: 100,
            no_crop: false,
            concurrent: false,
            threads: None,
        };
        rig(&args).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap().lines().count(), 1);
        assert!(dir.path().join("rig.provenance.json").exists());
    }
}
