//! Compiled-in sample table

use crate::ClassificationTable;

/// (code, description, rate)
const BUILTIN_ENTRIES: &[(&str, &str, &str)] = &[
    ("1001", "Wheat and meslin", "0"),
    ("1002", "Rye", "0"),
    ("1003", "Barley", "0"),
    ("1004", "Oats", "0"),
    ("1005", "Maize (corn)", "0"),
    ("1006", "Rice", "0"),
    ("1007", "Grain sorghum", "0"),
    ("1008", "Buckwheat, millet and canary seed; other cereals", "0"),
    ("2201", "Waters, including natural or artificial mineral waters", "18"),
    ("2202", "Waters, including mineral waters and aerated waters", "12"),
    ("2203", "Beer made from malt", "28"),
    ("2204", "Wine of fresh grapes", "28"),
    ("3004", "Medicaments consisting of mixed or unmixed products", "12"),
    ("3005", "Wadding, gauze, bandages and similar articles", "12"),
    ("6109", "T-shirts, singlets and other vests, knitted or crocheted", "12"),
    ("6110", "Jerseys, pullovers, cardigans, waistcoats", "12"),
    ("6203", "Men's or boys' suits, ensembles, jackets, blazers", "12"),
    ("6204", "Women's or girls' suits, ensembles, jackets, blazers", "12"),
    ("8409", "Parts suitable for use solely or principally with spark-ignition engines", "28"),
    ("8471", "Automatic data processing machines and units thereof", "18"),
    ("8517", "Telephone sets, including telephones for cellular networks", "12"),
    ("8528", "Monitors and projectors, not incorporating television reception", "18"),
    ("9403", "Other furniture and parts thereof", "18"),
    ("9404", "Mattress supports; articles of bedding", "18"),
];

/// Build the compiled-in table
pub fn builtin_table() -> crate::Result<ClassificationTable> {
    let mut builder = ClassificationTable::builder();
    for (code, description, rate) in BUILTIN_ENTRIES {
        builder.push_parts(code, description, rate.parse()?)?;
    }
    Ok(builder.build())
}
