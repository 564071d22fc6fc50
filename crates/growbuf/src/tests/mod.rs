mod property_sequence;
