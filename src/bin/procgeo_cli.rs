#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("procgeo_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use procgeo_engine::geom::{
        GeomMesh, ShapeLibrary, Tolerance, Topology, mesh_patches, place_instances, surfaces,
        tessellate, unit_box, unit_cylinder, weld_mesh,
    };
    use procgeo_engine::grammar::{EvaluationOptions, Grammar, Interpreter, library};
    use procgeo_engine::parse::rib;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"procgeo_cli (procgeo-engine)

USAGE:
  procgeo_cli list
  procgeo_cli run <scenario|all> [options]
  procgeo_cli rib <file.rib> [options]

SCENARIOS:
  torus      closed torus
  sphere     open sphere
  klein      closed Klein bottle
  mobius     closed Moebius band
  tree       grammar: spiralling tree of tubes
  octopod    grammar: ring of bending arms
  nouveau    grammar: wandering ribbons

OPTIONS:
  --out-dir <dir>    Write <scenario>.obj to this dir (required for `all`)
  --obj <path>       Write OBJ (single scenario only)
  --seed <n>         Grammar seed (default 29)
  --slices <n>       Surface slices, or patch u segments for `rib` (default 40)
  --stacks <n>       Surface stacks, or patch v segments for `rib` (default 10)
  --weld             Weld coincident vertices before writing
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    const DEFAULT_SEED: u64 = 29;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "rib" => cmd_rib(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    struct RunOptions {
        out_dir: Option<PathBuf>,
        obj_path: Option<PathBuf>,
        seed: u64,
        slices: usize,
        stacks: usize,
        weld: bool,
        overwrite: bool,
    }

    impl RunOptions {
        fn parse(args: &mut Args) -> Result<Option<Self>, String> {
            let mut options = Self {
                out_dir: None,
                obj_path: None,
                seed: DEFAULT_SEED,
                slices: 40,
                stacks: 10,
                weld: false,
                overwrite: false,
            };

            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--out-dir" => options.out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                    "--obj" => options.obj_path = Some(PathBuf::from(args.value("--obj")?)),
                    "--seed" => options.seed = args.number("--seed")?,
                    "--slices" => options.slices = args.number("--slices")?,
                    "--stacks" => options.stacks = args.number("--stacks")?,
                    "--weld" => options.weld = true,
                    "--overwrite" => options.overwrite = true,
                    "-h" | "--help" => {
                        print_usage();
                        return Ok(None);
                    }
                    other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
                }
            }

            if options.out_dir.is_some() && options.obj_path.is_some() {
                return Err("use either --out-dir or --obj (not both)".to_string());
            }
            Ok(Some(options))
        }

        fn finish(&self, mesh: GeomMesh) -> GeomMesh {
            if !self.weld {
                return mesh;
            }
            let (welded, merged) = weld_mesh(&mesh, Tolerance::WELD);
            eprintln!("welded {merged} vertices");
            welded
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;
        let Some(options) = RunOptions::parse(args)? else {
            return Ok(());
        };

        if let Some(dir) = options.out_dir.as_ref() {
            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, dir, &options)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(scenario_name.as_str())
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, dir, &options);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_str(scenario_name.as_str()).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let mesh = options.finish(run_scenario(scenario, &options)?);

        if let Some(path) = options.obj_path.as_deref() {
            write_obj_file(path, &mesh, scenario.name(), options.overwrite)?;
            eprintln!("wrote {}", path.display());
        }
        report(scenario.name(), &mesh);
        Ok(())
    }

    fn cmd_rib(args: &mut Args) -> Result<(), String> {
        let path = PathBuf::from(args.next().ok_or("missing RIB file")?);
        let Some(options) = RunOptions::parse(args)? else {
            return Ok(());
        };

        let text = fs::read_to_string(&path).map_err(|e| format!("read {}: {e}", path.display()))?;
        let patches = rib::parse_str(&text).map_err(|e| format!("{}: {e}", path.display()))?;
        eprintln!("{}: {} patches", path.display(), patches.len());
        let mesh = options.finish(mesh_patches(options.slices, options.stacks, &patches));

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("patches")
            .to_owned();
        let out = match (&options.obj_path, &options.out_dir) {
            (Some(obj), _) => Some(obj.clone()),
            (None, Some(dir)) => Some(dir.join(format!("{name}.obj"))),
            (None, None) => None,
        };
        if let Some(out) = out {
            write_obj_file(&out, &mesh, &name, options.overwrite)?;
            eprintln!("wrote {}", out.display());
        }
        report(&name, &mesh);
        Ok(())
    }

    fn run_one_scenario_to_dir(scenario: Scenario, dir: &Path, options: &RunOptions) -> Result<(), String> {
        let mesh = options.finish(run_scenario(scenario, options)?);
        let path = dir.join(format!("{}.obj", scenario.name()));
        write_obj_file(&path, &mesh, scenario.name(), options.overwrite)?;
        eprintln!("wrote {}", path.display());
        report(scenario.name(), &mesh);
        Ok(())
    }

    fn report(name: &str, mesh: &GeomMesh) {
        eprintln!(
            "{}: vertices={} triangles={}",
            name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            msg.push_str("  ");
            msg.push_str(scenario.name());
            msg.push('\n');
        }
        msg
    }

    fn write_obj_file(path: &Path, mesh: &GeomMesh, name: &str, overwrite: bool) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# procgeo-engine procgeo_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;

        for p in mesh.positions.iter().copied() {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
        }
        for [a, b, c] in mesh.faces.iter().copied() {
            writeln!(w, "f {} {} {}", a + 1, b + 1, c + 1).map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    #[derive(Debug, Clone, Copy)]
    enum Scenario {
        Torus,
        Sphere,
        Klein,
        Mobius,
        Tree,
        Octopod,
        Nouveau,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::Torus,
            Scenario::Sphere,
            Scenario::Klein,
            Scenario::Mobius,
            Scenario::Tree,
            Scenario::Octopod,
            Scenario::Nouveau,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::Torus => "torus",
                Scenario::Sphere => "sphere",
                Scenario::Klein => "klein",
                Scenario::Mobius => "mobius",
                Scenario::Tree => "tree",
                Scenario::Octopod => "octopod",
                Scenario::Nouveau => "nouveau",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|s| s.name() == name)
        }
    }

    fn run_scenario(scenario: Scenario, options: &RunOptions) -> Result<GeomMesh, String> {
        match scenario {
            Scenario::Torus | Scenario::Sphere | Scenario::Klein | Scenario::Mobius => {
                scenario_surface(scenario.name(), options)
            }
            Scenario::Tree | Scenario::Octopod | Scenario::Nouveau => {
                scenario_grammar(scenario.name(), options)
            }
        }
    }

    fn scenario_surface(name: &str, options: &RunOptions) -> Result<GeomMesh, String> {
        let surface = surfaces::by_name(name).ok_or_else(|| unknown_scenario(name))?;
        let topology = if surfaces::is_doubly_periodic(name) {
            Topology::Closed
        } else {
            Topology::Open
        };
        Ok(tessellate(options.slices, options.stacks, &surface, topology))
    }

    fn scenario_grammar(name: &str, options: &RunOptions) -> Result<GeomMesh, String> {
        let source = library::get(name).ok_or_else(|| unknown_scenario(name))?;
        let grammar = Grammar::from_xml(source).map_err(|e| format!("{name}: {e}"))?;

        let evaluation = Interpreter::with_options(&grammar, EvaluationOptions::with_seed(options.seed))
            .on_progress(|_| eprint!("."))
            .run()
            .map_err(|e| format!("{name}: {e}"))?;
        eprintln!(
            "\n{name}: generated {} shapes ({} frames, {} dropped)",
            evaluation.instances.len(),
            evaluation.stats.frames_processed,
            evaluation.stats.frames_dropped
        );

        place_instances(&evaluation.instances, &shape_library()).map_err(|e| format!("{name}: {e}"))
    }

    fn shape_library() -> ShapeLibrary {
        let mut library = ShapeLibrary::new();
        library
            .insert("box", unit_box())
            .insert("boxy", unit_box())
            .insert("tubey", unit_cylinder(12));
        library
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }

        fn number<T: std::str::FromStr>(&mut self, flag: &str) -> Result<T, String> {
            let raw = self.value(flag)?;
            raw.parse()
                .map_err(|_| format!("{flag} expects a non-negative integer, got `{raw}`"))
        }
    }
}
