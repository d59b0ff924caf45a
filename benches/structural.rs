// Benchmarks for output classification.

use criterion::{criterion_group, criterion_main, Criterion};
use mdconform::{classify, fragment, structurally_equal};

const EXPECTED: &str = "<table>\n<thead>\n<tr>\n<th>foo</th>\n<th>bar</th>\n</tr>\n</thead>\n\
<tbody>\n<tr>\n<td>baz</td>\n<td><a href=\"/u\" title=\"t\">bim</a></td>\n</tr>\n</tbody>\n</table>\n";
const ACTUAL: &str = "<table><thead><tr><th>foo</th><th>bar</th></tr></thead><tbody>\n\
<tr><td>baz</td><td><a title=\"t\" href=\"/u\">bim</a></td></tr>\n</tbody></table>\n";

fn bench_structural(c: &mut Criterion) {
    let expected = fragment::parse(EXPECTED);
    let actual = fragment::parse(ACTUAL);
    c.bench_function("structurally_equal", |b| {
        b.iter(|| structurally_equal(&expected, &actual));
    });
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_loose", |b| {
        b.iter(|| classify(EXPECTED, ACTUAL));
    });
}

criterion_group!(benches, bench_structural, bench_classify);
criterion_main!(benches);
