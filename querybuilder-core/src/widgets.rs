use querybuilder_model::FieldType;
use std::collections::HashSet;

/// The input widgets a renderer has registered, by input type.
pub trait InputWidgets {
    fn has_widget(&self, input_type: &FieldType) -> bool;
}

impl InputWidgets for HashSet<FieldType> {
    fn has_widget(&self, input_type: &FieldType) -> bool {
        self.contains(input_type)
    }
}

impl InputWidgets for [FieldType] {
    fn has_widget(&self, input_type: &FieldType) -> bool {
        self.contains(input_type)
    }
}

impl InputWidgets for Vec<FieldType> {
    fn has_widget(&self, input_type: &FieldType) -> bool {
        self.as_slice().has_widget(input_type)
    }
}
