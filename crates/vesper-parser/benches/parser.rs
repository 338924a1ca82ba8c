//! Benchmarks for the Vesper parser.
//!
//! - Simple constructs (functions, expressions)
//! - Complex constructs (classes, control flow)
//! - Scaling with increasing code size
//! - AST traversal operations
//!
//! Run with: `cargo bench --package vesper-parser`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use vesper_parser::parser::Parser;

const SIMPLE_FUNCTION: &str = r"
fun add(a: int, b: int) -> int {
    return a + b;
}
";

const FIBONACCI: &str = r"
fun fibonacci(n: int) -> int {
    if n <= 1 {
        return n;
    } else {
        return fibonacci(n - 1) + fibonacci(n - 2);
    }
}

result: int = fibonacci(10);
print result;
";

const CLASS_DEFINITION: &str = r"
class Point {
    x: float
    y: float

    fun distance(other: Point) -> float {
        dx: float = x - other.x;
        dy: float = y - other.y;
        return dx * dx + dy * dy;
    }
}
";

const COMPLEX_EXPRESSIONS: &str = r"
result: float = ((a + b) * (c - d) / e) + f % g;
condition: bool = (x > 0 and y < 100) or (z == 42 and w != 0);
";

const CONTROL_FLOW: &str = r#"
fun process(items: [int]) {
    for item in items {
        if item > 0 {
            if item % 2 == 0 {
                print "even positive";
            } else {
                print "odd positive";
            }
        } elif item < 0 {
            print "negative";
        }
    }

    i: int = 0;
    while i < items.length() {
        i = i + 1;
    }
}
"#;

const COMPREHENSIVE: &str = r#"
use Stack, Queue from "collections";

class DataProcessor {
    data: [int]
    cache: {int}

    fun process() -> int {
        result: int = 0;
        for value, i in data {
            if cache.has(value) {
                result = result + cache[value];
            } else {
                computed: int = compute(value);
                cache[value] = computed;
                result = result + computed;
            }
        }
        return result;
    }

    fun compute(n: int) -> int {
        if n <= 1 {
            return n;
        }
        return compute(n - 1) + compute(n - 2);
    }
}

fun main(args: [string]) {
    processor: DataProcessor = DataProcessor { data: [1, 2, 3, 4, 5], cache: {} };
    print processor.process();
}
"#;

fn bench_simple_function(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_simple_function", |bencher| {
        bencher.iter(|| Parser::parse_program(black_box(SIMPLE_FUNCTION)));
    });
}

fn bench_fibonacci(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_fibonacci", |bencher| {
        bencher.iter(|| Parser::parse_program(black_box(FIBONACCI)));
    });
}

fn bench_class_definition(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_class_definition", |bencher| {
        bencher.iter(|| Parser::parse_program(black_box(CLASS_DEFINITION)));
    });
}

fn bench_complex_expressions(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_complex_expressions", |bencher| {
        bencher.iter(|| Parser::parse_program(black_box(COMPLEX_EXPRESSIONS)));
    });
}

fn bench_control_flow(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_control_flow", |bencher| {
        bencher.iter(|| Parser::parse_program(black_box(CONTROL_FLOW)));
    });
}

fn bench_comprehensive(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("parse_comprehensive");
    let _ = group.throughput(Throughput::Bytes(COMPREHENSIVE.len() as u64));
    let _ = group.bench_function("comprehensive", |bencher| {
        bencher.iter(|| Parser::parse_program(black_box(COMPREHENSIVE)));
    });
    group.finish();
}

fn bench_scaling(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("parse_scaling");

    for size in &[10, 50, 100, 500] {
        let code = (0..*size).fold(String::new(), |acc, idx| {
            format!("{acc}\nfun func_{idx}(x: int) -> int {{\n    return x * {idx};\n}}\n")
        });

        let _ = group.throughput(Throughput::Bytes(code.len() as u64));
        let _ = group.bench_with_input(BenchmarkId::from_parameter(size), &code, |bencher, code| {
            bencher.iter(|| Parser::parse_program(black_box(code)));
        });
    }

    group.finish();
}

fn bench_ast_traversal(crit: &mut Criterion) {
    let (ast, top_level) = Parser::parse_program(COMPREHENSIVE).expect("failed to parse");
    let root = top_level[0];

    let _ = crit.bench_function("ast_pre_order_traversal", |bencher| {
        bencher.iter(|| {
            let nodes = black_box(ast.collect_nodes_pre_order(root));
            nodes.len()
        });
    });

    let _ = crit.bench_function("ast_post_order_traversal", |bencher| {
        bencher.iter(|| {
            let nodes = black_box(ast.collect_nodes_post_order(root));
            nodes.len()
        });
    });
}

criterion_group!(
    benches,
    bench_simple_function,
    bench_fibonacci,
    bench_class_definition,
    bench_complex_expressions,
    bench_control_flow,
    bench_comprehensive,
    bench_scaling,
    bench_ast_traversal,
);
criterion_main!(benches);
