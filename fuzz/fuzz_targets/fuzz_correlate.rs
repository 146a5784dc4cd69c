#![no_main]

use libfuzzer_sys::fuzz_target;
use nova_correlate::{
    correlate, Callee, CorrelationInput, DeclaredType, ExprNode, IndexRanges, LineIndex,
    MapResolver, MethodInvocation, NodeId, TextRange, TextSize,
};

mod utils;

const SOURCE: &str = "m();";

fuzz_target!(|data: &[u8]| {
    let data = utils::truncate(data);
    let Some((&node_count, code)) = data.split_first() else {
        return;
    };

    let span = TextRange::at(TextSize::from(0), TextSize::of(SOURCE));
    let nodes: Vec<ExprNode> = (0..u32::from(node_count % 32))
        .map(|i| {
            MethodInvocation::new(
                NodeId(i),
                span,
                Callee::Identifier {
                    id: NodeId(i),
                    name: "m".to_string(),
                    span: TextRange::at(TextSize::from(0), TextSize::from(1)),
                },
            )
            .into()
        })
        .collect();
    let Ok(ranges) = IndexRanges::new([0..code.len()], code.len()) else {
        return;
    };
    let resolver = MapResolver::new().with_default_enclosing_class(DeclaredType::new("Fuzz"));
    let line_index = LineIndex::new(SOURCE);

    let input = CorrelationInput::new(&nodes, &ranges, code);
    if let Ok(correlation) = correlate(&input, &resolver, &line_index) {
        assert_eq!(correlation.len(), nodes.len());
        for pair in correlation.operations().windows(2) {
            assert!(pair[0].bytecode_offset < pair[1].bytecode_offset);
        }
    }
});
