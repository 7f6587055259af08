use criterion::{Criterion, black_box, criterion_group, criterion_main};

use recupera::core::{aggregate, classify_all};
use recupera::nfe::{NFE_NAMESPACE, parse_nfe};

fn build_nfe(lines: usize) -> String {
    let mut dets = String::new();
    for i in 1..=lines {
        let cfop = if i % 2 == 0 { "5405" } else { "5102" };
        dets.push_str(&format!(
            "<det nItem=\"{i}\"><prod><xProd>Calcado modelo {i}</xProd>\
             <NCM>64041900</NCM><CFOP>{cfop}</CFOP><vProd>149.90</vProd></prod>\
             <imposto><ICMS><ICMSSN500><orig>0</orig><CSOSN>500</CSOSN></ICMSSN500></ICMS></imposto>\
             </det>"
        ));
    }
    format!(
        "<nfeProc xmlns=\"{NFE_NAMESPACE}\"><NFe><infNFe versao=\"4.00\">\
         <ide><nNF>777</nNF><dhEmi>2024-05-17T09:30:00-03:00</dhEmi></ide>{dets}\
         </infNFe></NFe></nfeProc>"
    )
}

fn bench_parse(c: &mut Criterion) {
    let small = build_nfe(10);
    let large = build_nfe(200);

    c.bench_function("parse_nfe_10_lines", |b| {
        b.iter(|| parse_nfe(black_box(&small)).unwrap())
    });

    c.bench_function("parse_nfe_200_lines", |b| {
        b.iter(|| parse_nfe(black_box(&large)).unwrap())
    });

    c.bench_function("parse_classify_aggregate_200_lines", |b| {
        b.iter(|| {
            let invoice = parse_nfe(black_box(&large)).unwrap();
            aggregate(&classify_all(invoice.items), "bench")
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
