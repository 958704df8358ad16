//! Per-type instance statistics.

use crate::handler::RecordHandler;
use crate::record::ClassDump;
use crate::string_table::StringTable;
use crate::typed_value::{FieldType, Value};
use crate::FastHashMap;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
struct Tally {
    count: u64,
    bytes: u64,
}

/// Aggregates instance counts and shallow sizes per type and prints a
/// table sorted by total size when the dump is done.
///
/// Arrays are keyed by JVM-style descriptors: `[Ljava/lang/String;` becomes
/// `[java.lang.String` only insofar as the class name string from the dump
/// is used verbatim, primitive arrays become `[int`, `[byte` and so on.
#[derive(Default)]
pub struct TypeStats {
    strings: StringTable,
    /// class object id -> name string id (from load-class records).
    class_names: FastHashMap<u64, u64>,
    /// class object id -> declared instance size (from class dumps).
    instance_sizes: FastHashMap<u64, u32>,
    /// display name -> tally.
    tallies: FastHashMap<String, Tally>,
}

impl TypeStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn class_name(&self, class_obj_id: u64) -> String {
        match self.class_names.get(&class_obj_id) {
            Some(name_id) => self.strings.get_or_hex(*name_id),
            None => format!("0x{class_obj_id:x}"),
        }
    }

    fn record(&mut self, name: String, bytes: u64) {
        let tally = self.tallies.entry(name).or_default();
        tally.count += 1;
        tally.bytes += bytes;
    }
}

impl RecordHandler for TypeStats {
    fn string_in_utf8(&mut self, id: u64, data: &str) {
        self.strings.insert(id, data);
    }

    fn load_class(
        &mut self,
        _class_serial: u32,
        class_obj_id: u64,
        _stack_trace_serial: u32,
        class_name_id: u64,
    ) {
        self.class_names.insert(class_obj_id, class_name_id);
    }

    fn class_dump(&mut self, dump: &ClassDump) {
        self.instance_sizes
            .insert(dump.class_obj_id, dump.instance_size);
    }

    fn instance_dump(
        &mut self,
        _obj_id: u64,
        _stack_trace_serial: u32,
        class_obj_id: u64,
        _values: &[Value],
    ) {
        let name = self.class_name(class_obj_id);
        let bytes = u64::from(
            self.instance_sizes
                .get(&class_obj_id)
                .copied()
                .unwrap_or(0),
        );
        self.record(name, bytes);
    }

    fn obj_array_dump(
        &mut self,
        _obj_id: u64,
        _stack_trace_serial: u32,
        elem_class_obj_id: u64,
        elements: &[u64],
    ) {
        let name = format!("[{}", self.class_name(elem_class_obj_id));
        // Referenzbreite ist hier unbekannt; 8 Bytes als obere Schranke.
        let bytes = 8 * elements.len() as u64;
        self.record(name, bytes);
    }

    fn prim_array_dump(
        &mut self,
        _obj_id: u64,
        _stack_trace_serial: u32,
        elem_type: FieldType,
        elements: &[Value],
    ) {
        let name = format!("[{elem_type}");
        let elem_bytes = match elem_type {
            FieldType::Bool | FieldType::Byte => 1,
            FieldType::Char | FieldType::Short => 2,
            FieldType::Float | FieldType::Int => 4,
            _ => 8,
        };
        self.record(name, elem_bytes * elements.len() as u64);
    }

    fn finished(&mut self) {
        let mut rows: Vec<(&String, &Tally)> = self.tallies.iter().collect();
        rows.sort_by(|a, b| b.1.bytes.cmp(&a.1.bytes).then_with(|| a.0.cmp(b.0)));

        println!("{:>12}  {:>12}  type", "bytes", "instances");
        for (name, tally) in rows {
            println!("{:>12}  {:>12}  {}", tally.bytes, tally.count, name);
        }
    }
}
