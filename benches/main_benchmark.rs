use criterion::{Criterion, criterion_group, criterion_main};
use mkconf::paths::ExecEnv;
use mkconf::persist;
use mkconf::project::{ConfId, Project};
use mkconf::render;
use mkconf::tool::AssemblerConfiguration;
use mkconf::toolchain::{CompilerType, OptionTable};
use std::hint::black_box;

const DEPTH: usize = 32;

/// A single inheritance chain `L0 <- L1 <- ... <- L{DEPTH-1}`, with the
/// address width overridden only at the root and extra flags on every level.
fn chain() -> (Project, ConfId) {
    let mut project = Project::new();
    let mut parent = None;
    let mut leaf = None;
    for level in 0..DEPTH {
        let id = project
            .add_configuration(
                &format!("L{level}"),
                ".",
                ExecEnv::Local,
                CompilerType::GCC,
                parent,
            )
            .unwrap();
        project
            .set_field(id, "assembler.command_line", &format!("--defsym L{level}=1"))
            .unwrap();
        parent = Some(id);
        leaf = Some(id);
    }
    let root = project.find("L0").unwrap();
    project.set_field(root, "assembler.sixty_four_bits", "2").unwrap();
    (project, leaf.unwrap())
}

fn bench_resolve_deep_chain(c: &mut Criterion) {
    let (project, leaf) = chain();
    let bits = project.aux::<AssemblerConfiguration>(leaf).unwrap().sixty_four_bits;
    c.bench_function("resolve_inherited_value_depth_32", |b| {
        b.iter(|| *project.cells.value(black_box(bits)))
    });
}

fn bench_all_options(c: &mut Criterion) {
    let (project, leaf) = chain();
    let gnu = OptionTable::builtin(CompilerType::GCC);
    c.bench_function("render_all_options_depth_32", |b| {
        b.iter(|| render::all_options(&project, black_box(leaf), &gnu).unwrap())
    });
}

fn bench_persist(c: &mut Criterion) {
    let (project, _) = chain();
    let file = persist::encode(&project);
    let text = toml::to_string(&file).unwrap();

    c.bench_function("encode_project_depth_32", |b| {
        b.iter(|| persist::encode(black_box(&project)))
    });
    c.bench_function("decode_project_depth_32", |b| {
        b.iter(|| {
            let file: persist::ProjectFile = toml::from_str(black_box(&text)).unwrap();
            persist::decode(&file).unwrap()
        })
    });
}

criterion_group!(benches, bench_resolve_deep_chain, bench_all_options, bench_persist);
criterion_main!(benches);
