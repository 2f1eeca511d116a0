pub mod cytoband;
